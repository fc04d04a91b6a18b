pub mod crisp;
pub mod fuzzy;
pub mod membership;

// Public re-exports
pub use crisp::{CrispDecision, CrispMatcher, MatchThresholds, PairwiseMatching, SingleClusterMatching};
pub use fuzzy::apply_fuzzy_cores;
pub use membership::{compute_fuzzy_sets, FuzzyLimiter};
