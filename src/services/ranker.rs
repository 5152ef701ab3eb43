use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::ml::vector::cosine_similarity;
use crate::models::ScorerSource;
use crate::services::catalog::Catalog;
use crate::services::embedding_store::EmbeddingStore;
use crate::services::keyword_fallback::KeywordFallbackScorer;
use crate::services::query_embedder::QueryEmbedder;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub product_id: String,
    pub score: f32,
}

/// Ranked, truncated, deduplicated candidates plus the scorer that
/// produced them. Scores are non-increasing; ties keep pool order.
#[derive(Debug, Clone)]
pub struct RankedResult {
    pub source: ScorerSource,
    pub candidates: Vec<ScoredCandidate>,
}

impl RankedResult {
    fn none() -> Self {
        Self {
            source: ScorerSource::None,
            candidates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankerOptions {
    pub top_k: usize,
    pub similarity_threshold: f32,
}

impl RankerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
        }
    }
}

/// The one ranking pipeline behind every call site: resolve a query
/// vector, scan the embedding pool, and degrade to keyword overlap when
/// vectors are unavailable or inconclusive.
pub struct Ranker {
    store: EmbeddingStore,
    embedder: Arc<QueryEmbedder>,
    fallback: KeywordFallbackScorer,
    options: RankerOptions,
}

impl Ranker {
    pub fn new(
        store: EmbeddingStore,
        embedder: Arc<QueryEmbedder>,
        fallback: KeywordFallbackScorer,
        options: RankerOptions,
    ) -> Self {
        Self {
            store,
            embedder,
            fallback,
            options,
        }
    }

    pub fn embedder(&self) -> &QueryEmbedder {
        &self.embedder
    }

    /// "Similar items" for a product page. The product's own embedding is
    /// the anchor, so there is no inconclusiveness threshold, and there is
    /// no text to fall back to: an unusable pool yields the empty result.
    ///
    /// A product id the store (or, when the store never loaded, the
    /// catalog) does not know is a client error, not a data-quality
    /// problem: no fallback, just `NotFound`.
    pub fn rank_by_product(&self, product_id: &str, catalog: &Catalog) -> Result<RankedResult> {
        if !self.store.is_available() {
            if catalog.get(product_id).is_none() {
                return Err(ApiError::NotFound(format!(
                    "Product {} not found",
                    product_id
                )));
            }
            return Ok(RankedResult::none());
        }

        let anchor = self.store.get(product_id).ok_or_else(|| {
            ApiError::NotFound(format!("Product {} not found", product_id))
        })?;

        if !anchor.is_valid() {
            return Ok(RankedResult::none());
        }

        let candidates =
            self.vector_rank(&anchor.vector, Some(product_id), self.options.top_k);
        if candidates.is_empty() {
            return Ok(RankedResult::none());
        }

        Ok(RankedResult {
            source: ScorerSource::Vector,
            candidates,
        })
    }

    /// Free-text recommendation. Embedding failures of any kind degrade to
    /// keyword fallback instead of failing the request.
    pub async fn rank_by_text(&self, text: &str, catalog: &Catalog, top_k: usize) -> RankedResult {
        let query_vector = match self.embedder.embed(text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!("Query embedding unavailable, using keyword fallback: {}", e);
                None
            }
        };

        self.rank_text_with_vector(query_vector.as_deref(), text, catalog, top_k)
    }

    /// The synchronous tail of the text pipeline, split out so the decision
    /// sequence is testable without a model.
    pub fn rank_text_with_vector(
        &self,
        query_vector: Option<&[f32]>,
        text: &str,
        catalog: &Catalog,
        top_k: usize,
    ) -> RankedResult {
        if let Some(query_vector) = query_vector {
            let candidates = self.vector_rank(query_vector, None, top_k);

            match candidates.first() {
                Some(best) if best.score > self.options.similarity_threshold => {
                    return RankedResult {
                        source: ScorerSource::Vector,
                        candidates,
                    };
                }
                Some(best) => {
                    // A weak semantic match is worse than an honest keyword
                    // match; fall through.
                    debug!(
                        best_score = best.score,
                        threshold = self.options.similarity_threshold,
                        "Vector result inconclusive"
                    );
                }
                None => {}
            }
        }

        // Keyword fallback scans the full catalog, not just the
        // embedding-valid subset.
        let candidates = self.fallback.score(text, catalog.products(), top_k);
        if candidates.is_empty() {
            return RankedResult::none();
        }

        RankedResult {
            source: ScorerSource::Keyword,
            candidates,
        }
    }

    /// Linear scan of the valid pool. Length-mismatched and zero-norm
    /// vectors are excluded rather than ranked as NaN; the sort is stable
    /// so ties keep store insertion order.
    fn vector_rank(
        &self,
        query: &[f32],
        exclude_id: Option<&str>,
        top_k: usize,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = self
            .store
            .all_valid()
            .filter(|record| exclude_id != Some(record.product_id.as_str()))
            .filter_map(|record| {
                cosine_similarity(query, &record.vector)
                    .filter(|score| score.is_finite())
                    .map(|score| ScoredCandidate {
                        product_id: record.product_id.clone(),
                        score,
                    })
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        scored
    }
}
