// lib/src/config/config_defaults.rs
use crate::config::config_structs::{ReappearConfig, SubgraphConfig, TransitionMode};
use crate::matching::crisp::MatchThresholds;
use crate::matching::membership::FuzzyLimiter;

pub fn default_mode() -> TransitionMode { TransitionMode::Crisp }
pub fn default_parallel() -> bool { false }
pub fn default_crisp_thresholds() -> MatchThresholds { MatchThresholds::default() }

pub fn default_reappear_enabled() -> bool { true }
pub fn default_reappear_threshold_passed() -> f64 { 0.5 }
pub fn default_reappear_threshold_criteria() -> f64 { 0.5 }
pub fn default_reappear_in_tuples() -> bool { false }
pub fn default_reappear_config() -> ReappearConfig {
    ReappearConfig {
        enabled: default_reappear_enabled(),
        threshold_passed: default_reappear_threshold_passed(),
        threshold_criteria: default_reappear_threshold_criteria(),
        in_tuples: default_reappear_in_tuples(),
    }
}

pub fn default_fuzzy_limiter() -> FuzzyLimiter { FuzzyLimiter::default() }

pub fn default_include_reappear() -> bool { true }
pub fn default_include_single_node() -> bool { false }
pub fn default_subgraph_config() -> SubgraphConfig {
    SubgraphConfig {
        include_reappear: default_include_reappear(),
        include_single_node: default_include_single_node(),
    }
}
