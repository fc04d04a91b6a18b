// lib/src/config/mod.rs
pub mod config_defaults;
pub mod config_structs;
pub mod config_impl_transition;

pub use config_structs::{FuzzyConfig, ReappearConfig, SubgraphConfig, TransitionConfig, TransitionMode};
