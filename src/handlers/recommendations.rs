use crate::{
    error::ApiError,
    models::RecommendationRequest,
    services::RecommendationService,
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use serde::Deserialize;

pub fn recommendations_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/recommendations/by-product/{product_id}")
            .route(web::get().to(similar_products)),
    )
    .service(
        web::resource("/recommendations/by-text")
            .route(web::get().to(recommendations_by_text_query))
            .route(web::post().to(recommendations_by_text_body)),
    );
}

/// Product-page "similar items": 404 for an unknown id, otherwise a 200
/// with an ordered list of full product records (possibly empty).
pub async fn similar_products(
    path: web::Path<String>,
    service: web::Data<RecommendationService>,
) -> Result<HttpResponse, ApiError> {
    let product_id = path.into_inner();
    let response = service.similar_to_product(&product_id)?;
    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
pub struct TextQuery {
    q: String,
    #[serde(default)]
    top_k: Option<usize>,
}

/// Free-text recommendations via query string. Empty results are a 200
/// with an empty list, never a 404.
pub async fn recommendations_by_text_query(
    query: web::Query<TextQuery>,
    service: web::Data<RecommendationService>,
) -> Result<HttpResponse, ApiError> {
    let response = service.for_query(&query.q, query.top_k).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Free-text recommendations via JSON body, for callers that POST.
pub async fn recommendations_by_text_body(
    request: Json<RecommendationRequest>,
    service: web::Data<RecommendationService>,
) -> Result<HttpResponse, ApiError> {
    let response = service.for_query(&request.query, request.top_k).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::embedding_store::{EmbeddingRecord, EmbeddingStore};
    use crate::test_support::{product, recommendation_service};
    use actix_web::{test, App};

    fn store() -> EmbeddingStore {
        EmbeddingStore::from_records([
            EmbeddingRecord {
                product_id: "1".to_string(),
                vector: vec![1.0, 0.0],
            },
            EmbeddingRecord {
                product_id: "2".to_string(),
                vector: vec![0.9, 0.1],
            },
        ])
    }

    fn service_data() -> web::Data<RecommendationService> {
        web::Data::new(recommendation_service(
            store(),
            vec![product("1", "Red Sneakers"), product("2", "Blue Sneakers")],
        ))
    }

    #[actix_web::test]
    async fn similar_products_returns_resolved_records() {
        let app = test::init_service(
            App::new()
                .app_data(service_data())
                .configure(recommendations_config),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/recommendations/by-product/1")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["source"], "vector");
        assert_eq!(body["results"][0]["ProductID"], "2");
        assert!(body["results"][0]["score"].as_f64().unwrap() > 0.9);
    }

    #[actix_web::test]
    async fn unknown_product_is_404() {
        let app = test::init_service(
            App::new()
                .app_data(service_data())
                .configure(recommendations_config),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/recommendations/by-product/999")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn text_query_with_no_matches_is_200_with_empty_list() {
        let app = test::init_service(
            App::new()
                .app_data(service_data())
                .configure(recommendations_config),
        )
        .await;
        // The offline embedder degrades to keywords; "wristwatch" matches
        // nothing in the fixture catalog.
        let req = test::TestRequest::get()
            .uri("/recommendations/by-text?q=wristwatch")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["source"], "none");
        assert_eq!(body["results"].as_array().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn blank_text_query_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(service_data())
                .configure(recommendations_config),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/recommendations/by-text")
            .set_json(serde_json::json!({ "query": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn keyword_fallback_answers_posted_queries() {
        let app = test::init_service(
            App::new()
                .app_data(service_data())
                .configure(recommendations_config),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/recommendations/by-text")
            .set_json(serde_json::json!({ "query": "red sneakers" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["source"], "keyword");
        assert_eq!(body["results"][0]["ProductID"], "1");
    }
}
