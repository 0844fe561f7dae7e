//! Cloud data access
//!
//! This module owns the on-disk cloud formats: the sphere hierarchy and the
//! flat point positions it indexes into. Data lives in memory-mapped files
//! and is decoded on the fly; nothing here caches or copies node records.

pub mod mapping;
pub mod point_store;
pub mod sphere_tree;

// Mapping entry points
pub use mapping::{map_points, map_tree, open_cloud};

// Point positions
pub use point_store::{PointOffset, PointSource, PointStore, FLOATS_PER_POINT};

// Sphere hierarchy
pub use sphere_tree::{
    BoundingVolume, NodeRecord, SphereTree, TreeHeader, TreeOffset, TreeSource, TreeSummary,
    HEADER_WORDS, MAX_TREE_DEPTH,
};
