// lib/src/config/config_structs.rs
use serde::{Deserialize, Serialize};

use crate::config::config_defaults::*;
use crate::matching::crisp::MatchThresholds;
use crate::matching::membership::FuzzyLimiter;

/// Which transition model the assembly builds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    Crisp,
    Fuzzy,
}

/// Everything the graph assembly needs besides the timeline itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default = "default_mode")]
    pub mode: TransitionMode,
    /// Compute crisp pair matchings on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_crisp_thresholds")]
    pub crisp: MatchThresholds,
    #[serde(default = "default_reappear_config")]
    pub reappear: ReappearConfig,
    #[serde(default)]
    pub fuzzy: FuzzyConfig,
    #[serde(default = "default_subgraph_config")]
    pub subgraphs: SubgraphConfig,
}

/// Reappearance search across gaps of two or more timepoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReappearConfig {
    #[serde(default = "default_reappear_enabled")]
    pub enabled: bool,
    #[serde(default = "default_reappear_threshold_passed")]
    pub threshold_passed: f64,
    #[serde(default = "default_reappear_threshold_criteria")]
    pub threshold_criteria: f64,
    /// List forward reappear edges among the crisp transition tuples.
    #[serde(default = "default_reappear_in_tuples")]
    pub in_tuples: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    #[serde(default = "default_fuzzy_limiter")]
    pub limiter: FuzzyLimiter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphConfig {
    #[serde(default = "default_include_reappear")]
    pub include_reappear: bool,
    #[serde(default = "default_include_single_node")]
    pub include_single_node: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        TransitionConfig {
            mode: default_mode(),
            parallel: default_parallel(),
            crisp: default_crisp_thresholds(),
            reappear: default_reappear_config(),
            fuzzy: FuzzyConfig::default(),
            subgraphs: default_subgraph_config(),
        }
    }
}

impl Default for ReappearConfig {
    fn default() -> Self {
        default_reappear_config()
    }
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        FuzzyConfig {
            limiter: default_fuzzy_limiter(),
        }
    }
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        default_subgraph_config()
    }
}
