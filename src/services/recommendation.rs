use crate::error::{ApiError, Result};
use crate::models::{RecommendationResponse, RecommendedProduct};
use crate::services::catalog::Catalog;
use crate::services::ranker::{RankedResult, Ranker};
use tracing::info;

// Upper bound for client-supplied top_k overrides.
const MAX_TOP_K: usize = 50;

/// Boundary adapter over the Ranker: validates input, runs the ranking
/// pipeline, and resolves ranked ids back to full catalog records.
pub struct RecommendationService {
    catalog: Catalog,
    ranker: Ranker,
    default_top_k: usize,
}

impl RecommendationService {
    pub fn new(catalog: Catalog, ranker: Ranker, default_top_k: usize) -> Self {
        Self {
            catalog,
            ranker,
            default_top_k,
        }
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Product-page "similar items". 404s on unknown ids; otherwise always
    /// answers, possibly with an empty list.
    pub fn similar_to_product(&self, product_id: &str) -> Result<RecommendationResponse> {
        let ranked = self.ranker.rank_by_product(product_id, &self.catalog)?;
        info!(
            product_id,
            source = ?ranked.source,
            count = ranked.candidates.len(),
            "Ranked similar products"
        );
        Ok(self.resolve(ranked))
    }

    /// Free-text recommendation. Internal failures degrade; the only
    /// client-facing error is a blank query.
    pub async fn for_query(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<RecommendationResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidInput("Query cannot be empty".to_string()));
        }

        let top_k = top_k.unwrap_or(self.default_top_k).clamp(1, MAX_TOP_K);
        let ranked = self.ranker.rank_by_text(query, &self.catalog, top_k).await;
        info!(
            query,
            source = ?ranked.source,
            count = ranked.candidates.len(),
            "Ranked text query"
        );
        Ok(self.resolve(ranked))
    }

    // Ids the catalog no longer knows are dropped rather than returned bare.
    fn resolve(&self, ranked: RankedResult) -> RecommendationResponse {
        let results = ranked
            .candidates
            .into_iter()
            .filter_map(|candidate| {
                self.catalog
                    .get(&candidate.product_id)
                    .map(|product| RecommendedProduct {
                        product: product.clone(),
                        score: candidate.score,
                    })
            })
            .collect();

        RecommendationResponse {
            source: ranked.source,
            results,
        }
    }
}
