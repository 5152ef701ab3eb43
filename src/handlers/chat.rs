//! Chat widget adapter: the same Ranker behind a conversational surface.
//! Small talk is answered from canned tables; anything else is treated as
//! a product query, with friendly copy instead of raw errors.

use crate::{
    error::ApiError,
    models::{ChatRequest, ChatResponse},
    services::RecommendationService,
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use once_cell::sync::Lazy;

static GREETINGS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "hello",
        "hi",
        "hey",
        "good morning",
        "good afternoon",
        "good evening",
        "greetings",
    ]
});

static GOODBYES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec!["bye", "goodbye", "see you", "later", "farewell", "take care"]
});

static THANKS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["thank you", "thanks", "thx", "appreciate it", "thank u"]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallTalk {
    Greeting,
    Goodbye,
    Thanks,
}

/// Detect small talk the way the storefront widget does: greetings match
/// at the start of the message, goodbyes and thanks anywhere in it.
pub fn classify_small_talk(message: &str) -> Option<SmallTalk> {
    let message = message.trim().to_lowercase();

    if GREETINGS
        .iter()
        .any(|g| message == *g || message.starts_with(g))
    {
        return Some(SmallTalk::Greeting);
    }
    if GOODBYES.iter().any(|g| message.contains(g)) {
        return Some(SmallTalk::Goodbye);
    }
    if THANKS.iter().any(|t| message.contains(t)) {
        return Some(SmallTalk::Thanks);
    }

    None
}

fn small_talk_reply(kind: SmallTalk) -> &'static str {
    match kind {
        SmallTalk::Greeting => "Hello! How can I help you today?",
        SmallTalk::Goodbye => "Goodbye! If you need anything else, just open the chat again.",
        SmallTalk::Thanks => "You're welcome! Let me know if you need anything else.",
    }
}

pub fn chat_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/chat").route(web::post().to(chat)));
}

pub async fn chat(
    request: Json<ChatRequest>,
    service: web::Data<RecommendationService>,
) -> Result<HttpResponse, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::InvalidInput("Message cannot be empty".to_string()));
    }

    if let Some(kind) = classify_small_talk(message) {
        return Ok(HttpResponse::Ok().json(ChatResponse {
            reply: small_talk_reply(kind).to_string(),
            products: Vec::new(),
        }));
    }

    let recommendations = service.for_query(message, None).await?;
    let reply = if recommendations.results.is_empty() {
        "I'm here to help with shopping and recommendations. \
         Try asking for a product, like \"red sneakers\"!"
            .to_string()
    } else {
        "Here are some recommendations:".to_string()
    };

    Ok(HttpResponse::Ok().json(ChatResponse {
        reply,
        products: recommendations.results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::EmbeddingStore;
    use crate::test_support::{product, recommendation_service};
    use actix_web::{test as actix_test, App};

    #[test]
    fn classifies_small_talk() {
        assert_eq!(classify_small_talk("Hello there"), Some(SmallTalk::Greeting));
        assert_eq!(classify_small_talk("ok bye now"), Some(SmallTalk::Goodbye));
        assert_eq!(classify_small_talk("thanks a lot"), Some(SmallTalk::Thanks));
        assert_eq!(classify_small_talk("red sneakers"), None);
    }

    #[actix_web::test]
    async fn small_talk_gets_a_canned_reply_without_ranking() {
        let service = web::Data::new(recommendation_service(
            EmbeddingStore::unavailable(),
            vec![],
        ));
        let app = actix_test::init_service(
            App::new().app_data(service).configure(chat_config),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "hello" }))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["reply"], "Hello! How can I help you today?");
        assert_eq!(body["products"].as_array().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn product_queries_get_recommendations_with_friendly_copy() {
        let service = web::Data::new(recommendation_service(
            EmbeddingStore::unavailable(),
            vec![product("1", "Red Sneakers")],
        ));
        let app = actix_test::init_service(
            App::new().app_data(service).configure(chat_config),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "red sneakers" }))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["reply"], "Here are some recommendations:");
        assert_eq!(body["products"][0]["ProductID"], "1");
    }

    #[actix_web::test]
    async fn empty_results_get_a_friendly_fallback_message() {
        let service = web::Data::new(recommendation_service(
            EmbeddingStore::unavailable(),
            vec![product("1", "Wool Scarf")],
        ));
        let app = actix_test::init_service(
            App::new().app_data(service).configure(chat_config),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "spaceship parts" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["products"].as_array().unwrap().len(), 0);
        assert!(body["reply"].as_str().unwrap().contains("recommendations"));
    }
}
