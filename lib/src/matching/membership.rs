// lib/src/matching/membership.rs
//! Trapezoidal membership functions mapping a core value onto the
//! weak/medium/strong fuzzy sets.

use serde::{Deserialize, Serialize};
use models::{FuzzyStrength, ValidationError, ValidationResult};

/// The four breakpoints `a <= b <= c <= d` shared by the three sets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct FuzzyLimiter {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl FuzzyLimiter {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> ValidationResult<Self> {
        let values = [a, b, c, d];
        let well_formed = values.iter().all(|v| v.is_finite() && *v >= 0.0)
            && values.windows(2).all(|pair| pair[0] <= pair[1])
            && a < d;
        if !well_formed {
            return Err(ValidationError::InvalidLimiter(values));
        }
        Ok(FuzzyLimiter { a, b, c, d })
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// 1 on `[0, a]`, falling to 0 across `(a, b)`.
    pub fn weak(&self, x: f64) -> Option<f64> {
        if (0.0..=self.a).contains(&x) {
            Some(1.0)
        } else if self.a < x && x < self.b {
            Some((self.b - x) / (self.b - self.a))
        } else {
            None
        }
    }

    /// Rising across `(a, b)`, 1 on `[b, c]`, falling across `(c, d)`.
    pub fn medium(&self, x: f64) -> Option<f64> {
        if self.a < x && x < self.b {
            Some((x - self.a) / (self.b - self.a))
        } else if self.b <= x && x <= self.c {
            Some(1.0)
        } else if self.c < x && x < self.d {
            Some((self.d - x) / (self.d - self.c))
        } else {
            None
        }
    }

    /// Rising across `(c, d)`, 1 from `d` on.
    pub fn strong(&self, x: f64) -> Option<f64> {
        if self.c < x && x < self.d {
            Some((x - self.c) / (self.d - self.c))
        } else if x >= self.d {
            Some(1.0)
        } else {
            None
        }
    }
}

impl Default for FuzzyLimiter {
    fn default() -> Self {
        FuzzyLimiter {
            a: 0.3,
            b: 0.4,
            c: 0.6,
            d: 0.7,
        }
    }
}

impl TryFrom<[f64; 4]> for FuzzyLimiter {
    type Error = ValidationError;

    fn try_from([a, b, c, d]: [f64; 4]) -> Result<Self, Self::Error> {
        FuzzyLimiter::new(a, b, c, d)
    }
}

impl From<FuzzyLimiter> for [f64; 4] {
    fn from(limiter: FuzzyLimiter) -> Self {
        limiter.as_array()
    }
}

/// Nonzero membership degrees of `x`, in weak, medium, strong order.
pub fn compute_fuzzy_sets(x: f64, limiter: &FuzzyLimiter) -> Vec<(FuzzyStrength, f64)> {
    [
        (FuzzyStrength::Weak, limiter.weak(x)),
        (FuzzyStrength::Medium, limiter.medium(x)),
        (FuzzyStrength::Strong, limiter.strong(x)),
    ]
    .into_iter()
    .filter_map(|(strength, degree)| degree.filter(|d| *d != 0.0).map(|d| (strength, d)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_jaccard_example_is_fully_medium() {
        let sets = compute_fuzzy_sets(0.6, &FuzzyLimiter::default());
        assert_eq!(sets, vec![(FuzzyStrength::Medium, 1.0)]);
    }

    #[test]
    fn test_low_values_are_weak() {
        let limiter = FuzzyLimiter::default();
        assert_eq!(compute_fuzzy_sets(0.0, &limiter), vec![(FuzzyStrength::Weak, 1.0)]);
        assert_eq!(compute_fuzzy_sets(0.3, &limiter), vec![(FuzzyStrength::Weak, 1.0)]);
    }

    #[test]
    fn test_transition_zones_overlap() {
        let limiter = FuzzyLimiter::default();

        let sets = compute_fuzzy_sets(0.35, &limiter);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].0, FuzzyStrength::Weak);
        assert!(approx(sets[0].1, 0.5));
        assert_eq!(sets[1].0, FuzzyStrength::Medium);
        assert!(approx(sets[1].1, 0.5));

        let sets = compute_fuzzy_sets(0.675, &limiter);
        assert_eq!(sets[0].0, FuzzyStrength::Medium);
        assert!(approx(sets[0].1, 0.25));
        assert_eq!(sets[1].0, FuzzyStrength::Strong);
        assert!(approx(sets[1].1, 0.75));
    }

    #[test]
    fn test_high_values_are_strong() {
        let limiter = FuzzyLimiter::default();
        assert_eq!(compute_fuzzy_sets(0.7, &limiter), vec![(FuzzyStrength::Strong, 1.0)]);
        assert_eq!(compute_fuzzy_sets(1.0, &limiter), vec![(FuzzyStrength::Strong, 1.0)]);
    }

    #[test]
    fn test_degrees_are_bounded_and_never_empty() {
        let limiters = [
            FuzzyLimiter::default(),
            FuzzyLimiter::new(0.2, 0.2, 0.5, 0.8).unwrap(),
            FuzzyLimiter::new(0.1, 0.4, 0.7, 0.7).unwrap(),
            FuzzyLimiter::new(0.3, 0.5, 0.5, 0.6).unwrap(),
            FuzzyLimiter::new(0.4, 0.4, 0.4, 0.9).unwrap(),
            FuzzyLimiter::new(0.1, 0.6, 0.6, 0.6).unwrap(),
            FuzzyLimiter::new(0.0, 0.0, 0.0, 0.5).unwrap(),
        ];
        for limiter in &limiters {
            for step in 0..=100 {
                let x = step as f64 / 100.0;
                let sets = compute_fuzzy_sets(x, limiter);
                assert!(!sets.is_empty(), "no membership for {} under {:?}", x, limiter);
                assert!(sets.len() <= 2, "too many memberships for {} under {:?}", x, limiter);
                assert!(sets.iter().all(|(_, d)| *d > 0.0 && *d <= 1.0));
            }
        }
    }

    #[test]
    fn test_negative_core_has_no_membership() {
        assert!(compute_fuzzy_sets(-0.1, &FuzzyLimiter::default()).is_empty());
    }

    #[test]
    fn test_limiter_validation() {
        assert!(FuzzyLimiter::new(0.1, 0.2, 0.3, 0.4).is_ok());
        assert!(FuzzyLimiter::new(0.2, 0.2, 0.2, 0.3).is_ok());
        assert_eq!(
            FuzzyLimiter::new(0.2, 0.2, 0.2, 0.2),
            Err(ValidationError::InvalidLimiter([0.2, 0.2, 0.2, 0.2]))
        );
        assert_eq!(
            FuzzyLimiter::new(0.4, 0.3, 0.6, 0.7),
            Err(ValidationError::InvalidLimiter([0.4, 0.3, 0.6, 0.7]))
        );
        assert!(FuzzyLimiter::new(-0.1, 0.3, 0.6, 0.7).is_err());
        assert!(FuzzyLimiter::new(0.1, 0.3, 0.6, f64::INFINITY).is_err());
    }

    #[test]
    fn test_limiter_serializes_as_array() {
        let json = serde_json::to_string(&FuzzyLimiter::default()).unwrap();
        assert_eq!(json, "[0.3,0.4,0.6,0.7]");

        let parsed: FuzzyLimiter = serde_json::from_str("[0.1,0.2,0.5,0.9]").unwrap();
        assert_eq!(parsed.as_array(), [0.1, 0.2, 0.5, 0.9]);
        assert!(serde_json::from_str::<FuzzyLimiter>("[0.9,0.2,0.5,0.1]").is_err());
    }
}
