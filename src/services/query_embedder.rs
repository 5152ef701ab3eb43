use crate::error::{ApiError, Result};
use crate::ml::HuggingFaceEmbedder;
use tokio::sync::OnceCell;
use tracing::{error, info};

const WARMUP_TEXT: &str = "warm up the embedding model";

/// Turns free text into a query vector, owning the model lifecycle:
/// `Uninitialized -> Loading -> Ready | Failed`, with the transition
/// happening at most once per process. Concurrent first callers await the
/// same in-flight warm-up instead of issuing parallel loads.
///
/// Once `Failed`, every later call returns `ModelUnavailable` without
/// re-attempting the load for the remaining process lifetime. That trades
/// recovery for never repeating a slow failure. A per-call inference error
/// after `Ready` is `EmbeddingFailed` and leaves the state untouched.
pub struct QueryEmbedder {
    model: HuggingFaceEmbedder,
    init: OnceCell<std::result::Result<(), String>>,
}

impl QueryEmbedder {
    pub fn new(model: HuggingFaceEmbedder) -> Self {
        Self {
            model,
            init: OnceCell::new(),
        }
    }

    /// Drive initialization to `Ready` or `Failed`. Safe to call from many
    /// tasks; only the first actually talks to the model.
    pub async fn warm_up(&self) -> Result<()> {
        let outcome = self
            .init
            .get_or_init(|| async {
                info!(model = self.model.model_name(), "Loading embedding model");
                match self.model.encode(WARMUP_TEXT).await {
                    Ok(_) => {
                        info!("Embedding model ready");
                        Ok(())
                    }
                    Err(e) => {
                        error!(
                            "Embedding model failed to initialize, \
                             disabling semantic ranking for this process: {}",
                            e
                        );
                        Err(e.to_string())
                    }
                }
            })
            .await;

        outcome
            .as_ref()
            .map_err(|reason| ApiError::ModelUnavailable(reason.clone()))?;
        Ok(())
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.warm_up().await?;

        self.model.encode(text).await.map_err(|e| match e {
            ApiError::ModelUnavailable(_) => e,
            other => ApiError::EmbeddingFailed(other.to_string()),
        })
    }

    pub fn state(&self) -> EmbedderState {
        match self.init.get() {
            None => EmbedderState::Uninitialized,
            Some(Ok(())) => EmbedderState::Ready,
            Some(Err(_)) => EmbedderState::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderState {
    Uninitialized,
    Ready,
    Failed,
}

impl EmbedderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedderState::Uninitialized => "uninitialized",
            EmbedderState::Ready => "ready",
            EmbedderState::Failed => "failed",
        }
    }
}
