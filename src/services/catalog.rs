use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::Product;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use tracing::info;

/// Read-only client for the catalog collaborator (Supabase REST).
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_key.clone(),
            table: config.catalog_table.clone(),
        }
    }

    pub async fn fetch_all(&self) -> Result<Vec<Product>> {
        let url = format!("{}/rest/v1/{}?select=*", self.base_url, self.table);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .send()
            .await
            .map_err(|e| ApiError::ExternalServiceError(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let products: Vec<Product> = response
                    .json()
                    .await
                    .map_err(|e| ApiError::SerializationError(e.to_string()))?;
                info!(count = products.len(), table = %self.table, "Catalog fetched");
                Ok(products)
            }
            status => Err(ApiError::ExternalServiceError(format!(
                "Catalog fetch returned unexpected status: {}",
                status
            ))),
        }
    }
}

/// Immutable catalog snapshot taken at startup. Iteration order is the
/// fetch order, which doubles as the ranking tie-break order.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let mut catalog = Self {
            products: Vec::with_capacity(products.len()),
            index: HashMap::with_capacity(products.len()),
        };

        for product in products {
            // First row wins on duplicate ids.
            if catalog.index.contains_key(&product.id) {
                continue;
            }
            catalog
                .index
                .insert(product.id.clone(), catalog.products.len());
            catalog.products.push(product);
        }

        catalog
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.index.get(product_id).map(|&i| &self.products[i])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
