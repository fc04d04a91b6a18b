pub mod graph_evolution;
pub mod time_window;

pub use graph_evolution::GraphEvolution;
pub use time_window::{TimeWindow, Timeline};
