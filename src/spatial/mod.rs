//! Spatial indexing for canvas hit testing.
//!
//! Builds an R-tree over the card boxes of a laid-out tree so clicks, hover
//! and rubber-band selection resolve in O(log n).

mod rtree;

pub use rtree::{NodeBox, SpatialIndex};
