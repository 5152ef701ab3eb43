//! Prewarm endpoint to address cold start issues on serverless platforms

use crate::services::RecommendationService;
use actix_web::{get, web, HttpResponse};
use serde_json::json;
use tracing::{info, warn};

/// Drive the embedding model to `Ready` (or `Failed`) before the first
/// user query has to pay for it. A tripped breaker is reported as a
/// degradation, never a 5xx: keyword fallback still answers requests.
#[get("/prewarm")]
pub async fn prewarm(service: web::Data<RecommendationService>) -> HttpResponse {
    info!("Prewarming embedding model...");

    let embedder = service.ranker().embedder();
    let (status, detail) = match embedder.warm_up().await {
        Ok(()) => ("ok", None),
        Err(e) => {
            warn!("Prewarm left the service in keyword-only mode: {}", e);
            ("degraded", Some(e.to_string()))
        }
    };

    HttpResponse::Ok().json(json!({
        "status": status,
        "embedder": embedder.state().as_str(),
        "detail": detail,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
