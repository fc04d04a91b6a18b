pub mod graph;
pub mod vertex;
pub mod edge;
pub mod traversal;
pub mod export;

// Public re-exports
pub use graph::TransitionGraph;
pub use vertex::{ClusterNode, EdgeIndex, IntersectionIndex};
pub use edge::{Edge, IntersectionRecord};
