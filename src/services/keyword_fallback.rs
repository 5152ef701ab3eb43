use crate::models::Product;
use crate::services::ranker::ScoredCandidate;

/// Token-overlap scorer over product text fields. This is the degradation
/// path when vectors are missing or inconclusive, not a search engine: no
/// stemming, no field weighting, substring containment only (so "shirt"
/// matches "shirts").
#[derive(Debug, Clone)]
pub struct KeywordFallbackScorer {
    min_token_len: usize,
}

impl KeywordFallbackScorer {
    pub fn new(min_token_len: usize) -> Self {
        Self { min_token_len }
    }

    /// Score every candidate by how many query tokens its concatenated
    /// name/description/brand/gender/color text contains, drop zero scores,
    /// and return the top `top_k` in stable descending order.
    pub fn score(&self, query: &str, candidates: &[Product], top_k: usize) -> Vec<ScoredCandidate> {
        let query = query.to_lowercase();
        let tokens: Vec<&str> = query
            .split_whitespace()
            .filter(|token| token.len() > self.min_token_len)
            .collect();

        if tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .filter_map(|product| {
                let haystack = product.search_text();
                let hits = tokens
                    .iter()
                    .filter(|token| haystack.contains(**token))
                    .count();

                (hits > 0).then(|| ScoredCandidate {
                    product_id: product.id.clone(),
                    score: hits as f32,
                })
            })
            .collect();

        // Stable sort: ties keep catalog iteration order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, color: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "ProductID": id,
            "ProductName": name,
            "PrimaryColor": color,
        }))
        .unwrap()
    }

    #[test]
    fn multi_token_matches_rank_above_single_token_matches() {
        let catalog = vec![
            product("1", "Blue Denim Jacket", "Blue"),
            product("2", "Red Canvas Sneakers", "Red"),
            product("3", "Running Sneakers", "White"),
        ];

        let scorer = KeywordFallbackScorer::new(2);
        let ranked = scorer.score("red sneakers", &catalog, 4);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].product_id, "2"); // matches both tokens
        assert_eq!(ranked[0].score, 2.0);
        assert_eq!(ranked[1].product_id, "3"); // matches "sneakers" only
        assert_eq!(ranked[1].score, 1.0);
    }

    #[test]
    fn short_tokens_are_discarded() {
        let catalog = vec![product("1", "An Or To Of", "It")];

        let scorer = KeywordFallbackScorer::new(2);
        assert!(scorer.score("an or to of it", &catalog, 4).is_empty());
    }

    #[test]
    fn substring_containment_matches_plurals() {
        let catalog = vec![product("1", "Linen Shirts", "White")];

        let scorer = KeywordFallbackScorer::new(2);
        let ranked = scorer.score("shirt", &catalog, 4);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].product_id, "1");
    }

    #[test]
    fn zero_score_candidates_are_discarded() {
        let catalog = vec![
            product("1", "Wool Scarf", "Grey"),
            product("2", "Leather Belt", "Brown"),
        ];

        let scorer = KeywordFallbackScorer::new(2);
        assert!(scorer.score("sneakers", &catalog, 4).is_empty());
    }

    #[test]
    fn truncates_to_top_k_with_stable_ties() {
        let catalog: Vec<Product> = (1..=6)
            .map(|i| product(&i.to_string(), "Cotton Shirt", "Blue"))
            .collect();

        let scorer = KeywordFallbackScorer::new(2);
        let ranked = scorer.score("cotton shirt", &catalog, 4);

        assert_eq!(ranked.len(), 4);
        // All tie at score 2; catalog order must survive the sort.
        let ids: Vec<&str> = ranked.iter().map(|c| c.product_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }
}
