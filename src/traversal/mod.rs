//! Hierarchy traversal following DOP principles
//!
//! Data (cutoffs, transform, pass configuration) lives in
//! `traversal_data`, pure collection functions in `traversal_operations`.
//! Passes borrow the hierarchy and point store; they own nothing.

pub mod traversal_data;
pub mod traversal_operations;

// Pass parameters
pub use traversal_data::{
    LodThresholds, ModelTransform, TraversalConfig, COARSE_LOD_DEPTH, DEFAULT_LOD_FACTOR,
    DEFAULT_OVERVIEW_DEPTH, DEFAULT_POINT_COLOR, FINE_LOD_DEPTH,
};

// Collection passes
pub use traversal_operations::{collect_overview, collect_visible, lod_cutoff};
