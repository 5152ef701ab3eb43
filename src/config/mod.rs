use crate::error::{ApiError, Result};
use std::env;
use std::path::PathBuf;

// Observed-behavior defaults, overridable by env. The 0.3 threshold and the
// token length cutoff come from the deployed system and are deliberately
// configuration, not constants baked into the ranking code.
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_TOP_K: usize = 4;
const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.3;
const DEFAULT_MIN_TOKEN_LEN: usize = 2;
const DEFAULT_CATALOG_TABLE: &str = "fashionhub";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,

    // Catalog (Supabase REST)
    pub supabase_url: String,
    pub supabase_key: String,
    pub catalog_table: String,

    // Embedding source: bundled artifact when set, otherwise the embeddings
    // column on the catalog rows.
    pub embeddings_path: Option<PathBuf>,

    // Embedding model (HuggingFace inference API)
    pub huggingface_api_key: Option<String>,
    pub huggingface_base_url: String,
    pub huggingface_model: String,
    pub embedding_dim: usize,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,

    // Ranking
    pub top_k: usize,
    pub similarity_threshold: f32,
    pub min_token_len: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| ApiError::InternalError("SUPABASE_URL must be set".to_string()))?;
        let supabase_key = env::var("SUPABASE_KEY")
            .map_err(|_| ApiError::InternalError("SUPABASE_KEY must be set".to_string()))?;

        Ok(Config {
            port: parse_env("PORT", DEFAULT_PORT),
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            supabase_url,
            supabase_key,
            catalog_table: env::var("CATALOG_TABLE")
                .unwrap_or_else(|_| DEFAULT_CATALOG_TABLE.to_string()),
            embeddings_path: env::var("EMBEDDINGS_PATH").ok().map(PathBuf::from),
            huggingface_api_key: env::var("APP_HUGGINGFACE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            huggingface_base_url: env::var("APP_HUGGINGFACE_BASE_URL")
                .unwrap_or_else(|_| "https://api-inference.huggingface.co".to_string()),
            huggingface_model: env::var("APP_HUGGINGFACE_MODEL_NAME")
                .unwrap_or_else(|_| "sentence-transformers/all-MiniLM-L6-v2".to_string()),
            embedding_dim: parse_env("APP_EMBEDDING_DIM", 384),
            request_timeout_secs: parse_env("APP_HUGGINGFACE_TIMEOUT_SECONDS", 30),
            connect_timeout_secs: parse_env("APP_EXTERNAL_SERVICE_TIMEOUT_SECS", 15),
            top_k: parse_env("TOP_K", DEFAULT_TOP_K),
            similarity_threshold: parse_env("SIMILARITY_THRESHOLD", DEFAULT_SIMILARITY_THRESHOLD),
            min_token_len: parse_env("MIN_TOKEN_LEN", DEFAULT_MIN_TOKEN_LEN),
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
