//! Cosine-similarity answer scoring.
//!
//! A submission is scored by embedding both the reference answer and the
//! student's answer, then mapping the cosine distance `d` between the two
//! vectors to `round(100 * (1 - d))`.

use crate::error::ScoringError;

/// Compute the cosine distance between two vectors of equal dimension.
///
/// Distance lies in [0, 2] for arbitrary vectors, and in [0, 1] for the
/// non-negative embeddings typical of hosted text-embedding models.
///
/// Mismatched lengths, empty vectors, and zero-norm vectors are precondition
/// violations and return [`ScoringError::InvalidInput`].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64, ScoringError> {
    if a.is_empty() || b.is_empty() {
        return Err(ScoringError::InvalidInput(
            "embedding vector is empty".into(),
        ));
    }
    if a.len() != b.len() {
        return Err(ScoringError::InvalidInput(format!(
            "embedding dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    // Accumulate in f64; embedding components are small but dimensions
    // run to a few thousand.
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(ScoringError::InvalidInput(
            "embedding vector has zero norm".into(),
        ));
    }

    Ok(1.0 - dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Score a candidate answer embedding against the reference answer embedding.
///
/// Returns `round(100 * (1 - d))` where `d` is the cosine distance. The
/// result is intentionally NOT clamped: a distance above 1 yields a negative
/// score. That matches the stored-score convention and is surfaced as-is.
pub fn score(correct: &[f32], candidate: &[f32]) -> Result<i32, ScoringError> {
    let d = cosine_distance(correct, candidate)?;
    Ok((100.0 * (1.0 - d)).round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_direction_scores_100() {
        let v = vec![0.5f32, 0.25, 0.1];
        assert_eq!(score(&v, &v).unwrap(), 100);

        // Scaling does not change direction.
        let scaled: Vec<f32> = v.iter().map(|x| x * 3.0).collect();
        assert_eq!(score(&v, &scaled).unwrap(), 100);
    }

    #[test]
    fn orthogonal_unit_vectors_score_0() {
        let a = vec![1.0f32, 0.0];
        let b = vec![0.0f32, 1.0];
        assert!((cosine_distance(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(score(&a, &b).unwrap(), 0);
    }

    #[test]
    fn opposite_vectors_score_negative() {
        // Distance 2 for opposed vectors; the score is not clamped.
        let a = vec![1.0f32, 0.0];
        let b = vec![-1.0f32, 0.0];
        assert!((cosine_distance(&a, &b).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(score(&a, &b).unwrap(), -100);
    }

    #[test]
    fn partial_similarity_rounds() {
        // 45 degrees apart: distance = 1 - sqrt(2)/2 ≈ 0.2929, score ≈ 71.
        let a = vec![1.0f32, 0.0];
        let b = vec![1.0f32, 1.0];
        assert_eq!(score(&a, &b).unwrap(), 71);
    }

    #[test]
    fn dimension_mismatch_is_invalid_input() {
        let a = vec![1.0f32, 0.0];
        let b = vec![1.0f32, 0.0, 0.0];
        let err = score(&a, &b).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput(_)));
        assert!(err.to_string().contains("dimension mismatch"));
    }

    #[test]
    fn zero_vector_is_invalid_input() {
        let a = vec![0.0f32, 0.0];
        let b = vec![1.0f32, 0.0];
        assert!(matches!(
            score(&a, &b),
            Err(ScoringError::InvalidInput(_))
        ));
        assert!(matches!(
            score(&b, &a),
            Err(ScoringError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_vector_is_invalid_input() {
        assert!(matches!(
            cosine_distance(&[], &[]),
            Err(ScoringError::InvalidInput(_))
        ));
    }
}
