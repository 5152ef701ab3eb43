use crate::config::Config;
use crate::error::{ApiError, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Client for the HuggingFace feature-extraction inference API. The model
/// endpoint is a configuration detail; the contract is `encode(text)` into
/// a vector of the configured dimensionality.
#[derive(Debug, Clone)]
pub struct HuggingFaceEmbedder {
    client: Client,
    api_key: Option<String>,
    model_url: String,
    model_name: String,
    embedding_dim: usize,
}

impl HuggingFaceEmbedder {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ApiError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        let model_url = format!(
            "{}/models/{}",
            config.huggingface_base_url.trim_end_matches('/'),
            config.huggingface_model
        );

        Ok(Self {
            client,
            api_key: config.huggingface_api_key.clone(),
            model_url,
            model_name: config.huggingface_model.clone(),
            embedding_dim: config.embedding_dim,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// One inference call. Initialization-worthiness of a failure (circuit
    /// breaker vs per-call error) is the caller's decision; this method just
    /// reports what went wrong.
    pub async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct Request<'a> {
            inputs: &'a str,
            options: Options,
        }

        #[derive(Serialize)]
        struct Options {
            wait_for_model: bool,
            use_cache: bool,
        }

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ApiError::ModelUnavailable(
                "Missing APP_HUGGINGFACE_API_KEY environment variable".to_string(),
            )
        })?;

        let input = text.trim();
        let input = if input.is_empty() { "empty text" } else { input };

        let response = self
            .client
            .post(&self.model_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&Request {
                inputs: input,
                options: Options {
                    wait_for_model: true,
                    use_cache: true,
                },
            })
            .send()
            .await
            .map_err(|e| {
                ApiError::ExternalServiceError(format!(
                    "Failed to reach embedding model API: {}",
                    e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                404 => ApiError::ExternalServiceError(format!(
                    "Model not found: {}. Check the configured model name.",
                    self.model_name
                )),
                401 | 403 => ApiError::ExternalServiceError(
                    "Authentication failed. Check the HuggingFace API key.".to_string(),
                ),
                429 => ApiError::ExternalServiceError(
                    "Rate limit exceeded on the embedding model API.".to_string(),
                ),
                _ => ApiError::ExternalServiceError(format!(
                    "Embedding model API returned {}: {}",
                    status, body
                )),
            });
        }

        let value: serde_json::Value = response.json().await.map_err(|e| {
            ApiError::SerializationError(format!("Failed to parse model response: {}", e))
        })?;

        let embedding = parse_embedding(&value).ok_or_else(|| {
            ApiError::SerializationError(
                "Failed to extract an embedding from the model response".to_string(),
            )
        })?;

        if embedding.len() != self.embedding_dim {
            return Err(ApiError::EmbeddingFailed(format!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.embedding_dim,
                embedding.len()
            )));
        }

        debug!(dim = embedding.len(), "Encoded query text");
        Ok(embedding)
    }
}

// The inference API answers with either `[f32]` or `[[f32]]` depending on
// pooling; accept both.
fn parse_embedding(value: &serde_json::Value) -> Option<Vec<f32>> {
    let array = value.as_array()?;
    if array.is_empty() {
        return None;
    }

    let floats = if array[0].is_array() {
        array[0].as_array()?
    } else {
        array
    };

    let embedding: Vec<f32> = floats
        .iter()
        .filter_map(|v| v.as_f64().map(|f| f as f32))
        .collect();

    if embedding.len() == floats.len() && !embedding.is_empty() {
        Some(embedding)
    } else {
        None
    }
}
