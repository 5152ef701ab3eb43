//! Shared fixtures for unit tests. The embedder is built without an API
//! key so every model call fails locally, before any network traffic.

use crate::config::Config;
use crate::ml::HuggingFaceEmbedder;
use crate::models::Product;
use crate::services::{
    Catalog, EmbeddingStore, KeywordFallbackScorer, QueryEmbedder, Ranker, RankerOptions,
    RecommendationService,
};
use std::sync::Arc;

pub fn test_config() -> Config {
    Config {
        port: 0,
        host: "127.0.0.1".to_string(),
        supabase_url: "http://localhost".to_string(),
        supabase_key: "test".to_string(),
        catalog_table: "fashionhub".to_string(),
        embeddings_path: None,
        huggingface_api_key: None,
        huggingface_base_url: "http://localhost".to_string(),
        huggingface_model: "test-model".to_string(),
        embedding_dim: 2,
        request_timeout_secs: 1,
        connect_timeout_secs: 1,
        top_k: 4,
        similarity_threshold: 0.3,
        min_token_len: 2,
    }
}

pub fn offline_embedder() -> Arc<QueryEmbedder> {
    Arc::new(QueryEmbedder::new(
        HuggingFaceEmbedder::from_config(&test_config()).unwrap(),
    ))
}

pub fn ranker(store: EmbeddingStore) -> Ranker {
    let config = test_config();
    Ranker::new(
        store,
        offline_embedder(),
        KeywordFallbackScorer::new(config.min_token_len),
        RankerOptions::from_config(&config),
    )
}

pub fn recommendation_service(
    store: EmbeddingStore,
    products: Vec<Product>,
) -> RecommendationService {
    let config = test_config();
    RecommendationService::new(Catalog::new(products), ranker(store), config.top_k)
}

pub fn product(id: &str, name: &str) -> Product {
    serde_json::from_value(serde_json::json!({
        "ProductID": id,
        "ProductName": name,
    }))
    .unwrap()
}
