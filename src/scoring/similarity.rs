use super::types::NormalizedVector;

/// Cosine of the angle between two vectors; 0 when either has zero magnitude
pub fn cosine_similarity(a: &NormalizedVector, b: &NormalizedVector) -> f64 {
    let magnitude_a = a.dot(a).sqrt();
    let magnitude_b = b.dot(b).sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    a.dot(b) / (magnitude_a * magnitude_b)
}

/// Maps a similarity onto a 0-100 score with one decimal.
/// Negative similarity is not meaningful here and scores 0.
pub fn score_from_similarity(similarity: f64) -> f64 {
    if !similarity.is_finite() {
        return 0.0;
    }
    let percent = (similarity * 100.0).clamp(0.0, 100.0);
    (percent * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    fn test_self_similarity_is_one() {
        let v = array![0.5, -1.25, 2.0, 0.0, 3.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        let zero = Array1::zeros(5);
        let v = array![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_opposite_and_orthogonal_vectors() {
        let v = array![1.0, 0.0];
        assert!((cosine_similarity(&v, &array![-2.0, 0.0]) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&v, &array![0.0, 3.0]), 0.0);
    }

    #[test]
    fn test_score_rounding_and_clamping() {
        assert_eq!(score_from_similarity(0.87654), 87.7);
        assert_eq!(score_from_similarity(1.0), 100.0);
        assert_eq!(score_from_similarity(-0.4), 0.0);
        assert_eq!(score_from_similarity(f64::NAN), 0.0);
    }

    #[test]
    fn test_score_is_monotonic_and_bounded() {
        let mut previous = f64::MIN;
        for step in -150..=150 {
            let score = score_from_similarity(step as f64 / 100.0);
            assert!((0.0..=100.0).contains(&score));
            assert!(score >= previous);
            previous = score;
        }
    }
}
