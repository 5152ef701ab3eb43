//! Pure numeric primitives for similarity ranking.

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(a: &[f32]) -> f32 {
    a.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity of two vectors, `None` when the lengths differ or
/// either norm is zero. Callers exclude `None` candidates from ranking
/// instead of sorting NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return None;
    }

    Some(dot(a, b) / denom)
}
