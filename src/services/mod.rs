pub mod catalog;
pub mod embedding_store;
pub mod keyword_fallback;
pub mod query_embedder;
pub mod ranker;
pub mod recommendation;

// Re-export public types
pub use catalog::{Catalog, CatalogClient};
pub use embedding_store::EmbeddingStore;
pub use keyword_fallback::KeywordFallbackScorer;
pub use query_embedder::QueryEmbedder;
pub use ranker::{RankedResult, Ranker, RankerOptions, ScoredCandidate};
pub use recommendation::RecommendationService;
