//! Camera Module - Data-Oriented Programming (DOP) style
//!
//! This module follows pure DOP principles:
//! - camera_data.rs: Pure data structures with NO methods
//! - camera_operations.rs: Pure functions that operate on data
//! - frustum.rs: Plane/frustum geometry the operations derive and
//!   the traversal classifies against

pub mod camera_data;
pub mod camera_operations;
pub mod frustum;

// Re-export data structures
pub use camera_data::{CameraConfig, CameraData, Movement};
pub use frustum::{Frustum, FrustumCorners, Plane, Visibility};

// Re-export all operations
pub use camera_operations::{
    // Initialization
    init_camera,
    init_camera_from_config,

    // Derived state
    refresh_derived,

    // Movement
    process_movement,
    process_mouse_look,
    set_position,
    update_aspect_ratio,

    // View/projection
    build_view_matrix,
    build_projection_matrix,

    // Utilities
    distance_to,
    forward_from_angles,

    // Diagnostics
    frustum_outline_records,
    log_camera_context,
    FRUSTUM_OUTLINE_COLOR,
};
