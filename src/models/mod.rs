use serde::{Deserialize, Serialize};

pub use product::Product;

mod product;

/// Which scorer produced a result set. Callers use this to phrase the
/// response; the two score scales are never mixed in one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerSource {
    Vector,
    Keyword,
    None,
}

/// Request body for free-text recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// The search query to find product recommendations for
    pub query: String,
    /// Optional result count override, clamped server-side
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// One recommended product with the score its scorer assigned
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub score: f32,
}

/// Response envelope for both recommendation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub source: ScorerSource,
    pub results: Vec<RecommendedProduct>,
}

/// Request body for the chat widget adapter
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Chat reply: a friendly message plus any recommended products
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub products: Vec<RecommendedProduct>,
}
