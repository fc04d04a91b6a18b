// models/src/lib.rs
// Shared value types for the cluster transition engine: identifiers, the
// transition vocabulary, partition input and the error taxonomy.

pub mod edges;
pub mod errors;
pub mod identifiers;
pub mod properties;
pub mod vertices;

pub use edges::TransitionType;
pub use errors::{GraphError, GraphResult, ValidationError, ValidationResult};
pub use identifiers::{NodeId, Timepoint, NODE_ID_DELIMITER};
pub use properties::{FuzzyStrength, TransitionTuple};
pub use vertices::{Cluster, Element, Partition};
