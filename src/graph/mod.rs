//! Graph data structures and operations.
//!
//! Canonical person/relationship types, the validated [`Graph`] snapshot, and
//! a petgraph-backed [`GraphIndex`] for parent/child queries.

pub(crate) mod edge;
mod engine;
mod error;
pub(crate) mod node;

pub use edge::Edge;
pub use engine::{Graph, GraphIndex, Relatives};
pub use error::GraphError;
pub use node::{PersonNode, Position, Sex};
