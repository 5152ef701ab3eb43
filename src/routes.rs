use actix_web::{web, Scope};

use crate::handlers::{chat_config, health_check, prewarm::prewarm, recommendations_config};

/// Configure all routes for the API
pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(health_check)
        .service(prewarm)
        .configure(recommendations_config)
        .configure(chat_config)
}
