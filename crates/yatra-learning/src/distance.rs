//! Distance metrics for the nearest-neighbor classifier.

use serde::{Deserialize, Serialize};

/// Distance metric for comparing encoded feature vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Standard Euclidean (L2) distance
    Euclidean,
    /// Manhattan (L1) distance
    Manhattan,
    /// Cosine distance, 1 - cos(a, b)
    Cosine,
    /// Chebyshev (L∞) distance
    Chebyshev,
    /// Minkowski distance of order 3
    Minkowski,
}

impl DistanceMetric {
    /// The fixed order the evaluation iterates metrics in.
    pub const EVALUATION_ORDER: [DistanceMetric; 5] = [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Cosine,
        DistanceMetric::Chebyshev,
        DistanceMetric::Minkowski,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Chebyshev => "chebyshev",
            DistanceMetric::Minkowski => "minkowski",
        }
    }

    /// Compute the distance between two equal-length vectors.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => {
                a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
            }
            DistanceMetric::Cosine => {
                let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
                let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
                let norm_b: f64 = b.iter().map(|y| y * y).sum::<f64>().sqrt();
                if norm_a == 0.0 && norm_b == 0.0 {
                    0.0
                } else if norm_a == 0.0 || norm_b == 0.0 {
                    // A zero vector is maximally dissimilar to any other.
                    1.0
                } else {
                    1.0 - dot / (norm_a * norm_b)
                }
            }
            DistanceMetric::Chebyshev => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f64::max),
            DistanceMetric::Minkowski => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).abs().powi(3))
                .sum::<f64>()
                .cbrt(),
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 3] = [1.0, 2.0, 3.0];
    const B: [f64; 3] = [4.0, 2.0, -1.0];

    fn close(x: f64, y: f64) -> bool {
        (x - y).abs() < 1e-9
    }

    #[test]
    fn test_euclidean() {
        // sqrt(9 + 0 + 16) = 5
        assert!(close(DistanceMetric::Euclidean.distance(&A, &B), 5.0));
    }

    #[test]
    fn test_manhattan() {
        assert!(close(DistanceMetric::Manhattan.distance(&A, &B), 7.0));
    }

    #[test]
    fn test_chebyshev() {
        assert!(close(DistanceMetric::Chebyshev.distance(&A, &B), 4.0));
    }

    #[test]
    fn test_minkowski_order_three() {
        // (27 + 0 + 64)^(1/3)
        let expected = 91.0_f64.cbrt();
        assert!(close(DistanceMetric::Minkowski.distance(&A, &B), expected));
    }

    #[test]
    fn test_cosine_identical_vectors_is_zero() {
        assert!(close(DistanceMetric::Cosine.distance(&A, &A), 0.0));
    }

    #[test]
    fn test_cosine_orthogonal_vectors_is_one() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        assert!(close(DistanceMetric::Cosine.distance(&a, &b), 1.0));
    }

    #[test]
    fn test_cosine_zero_vector_guard() {
        let zero = [0.0, 0.0];
        let other = [1.0, 1.0];
        assert!(close(DistanceMetric::Cosine.distance(&zero, &other), 1.0));
        assert!(close(DistanceMetric::Cosine.distance(&zero, &zero), 0.0));
    }

    #[test]
    fn test_evaluation_order_is_fixed() {
        let names: Vec<&str> = DistanceMetric::EVALUATION_ORDER
            .iter()
            .map(|m| m.name())
            .collect();
        assert_eq!(
            names,
            vec!["euclidean", "manhattan", "cosine", "chebyshev", "minkowski"]
        );
    }

    #[test]
    fn test_all_metrics_are_zero_at_identity() {
        for metric in DistanceMetric::EVALUATION_ORDER {
            assert!(close(metric.distance(&A, &A), 0.0), "{metric}");
        }
    }
}
