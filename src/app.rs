use crate::{
    config::Config,
    error::Result,
    ml::HuggingFaceEmbedder,
    routes::api_routes,
    services::{
        Catalog, CatalogClient, EmbeddingStore, KeywordFallbackScorer, QueryEmbedder, Ranker,
        RankerOptions, RecommendationService,
    },
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing::{error, info};

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        // Always bind to 0.0.0.0 for Docker/Render compatibility
        let bind_address = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!("Starting server at http://{}:{}", self.host, self.port);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let service = web::Data::new(self.build_service().await?);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(service.clone())
                .service(api_routes())
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }

    // Startup loads: catalog snapshot, embedding store, model client. The
    // data loads degrade instead of aborting; a server with no vectors
    // still answers over keyword fallback, one with no catalog answers
    // empty. Only HTTP client construction itself is fatal.
    async fn build_service(&self) -> Result<RecommendationService> {
        let products = match CatalogClient::new(&self.config).fetch_all().await {
            Ok(products) => products,
            Err(e) => {
                error!("Catalog fetch failed, serving an empty catalog: {}", e);
                Vec::new()
            }
        };

        let store = EmbeddingStore::load(&self.config, &products);
        let catalog = Catalog::new(products);
        info!(
            products = catalog.len(),
            embeddings_available = store.is_available(),
            "Startup snapshot ready"
        );

        let embedder = QueryEmbedder::new(HuggingFaceEmbedder::from_config(&self.config)?);

        let ranker = Ranker::new(
            store,
            Arc::new(embedder),
            KeywordFallbackScorer::new(self.config.min_token_len),
            RankerOptions::from_config(&self.config),
        );

        Ok(RecommendationService::new(catalog, ranker, self.config.top_k))
    }
}
