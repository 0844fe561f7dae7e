// Emberpoint - Out-of-core point cloud streaming, Data-Oriented Programming (DOP) architecture
//
// The engine maps a sphere-bound point hierarchy from disk and streams the
// camera-visible subset into flat render buffers on a background thread.
//
// Conventions:
// - Data lives in *_data modules, behavior in *_operations modules
// - Pure functions over methods
// - Mutable state belongs to an explicit context, never a global

// Core data access
pub mod cloud;
pub mod error;

// Viewing
pub mod camera;
pub mod traversal;

// Streaming pipeline
pub mod stream;

// Configuration
pub mod config;

pub use error::{EngineError, EngineResult};

pub use camera::{
    init_camera, init_camera_from_config, process_mouse_look, process_movement,
    update_aspect_ratio, CameraConfig, CameraData, Frustum, Movement, Visibility,
};

pub use cloud::{
    map_points, map_tree, open_cloud, PointOffset, PointStore, SphereTree, TreeSummary,
};

pub use traversal::{
    collect_overview, collect_visible, LodThresholds, ModelTransform, TraversalConfig,
};

pub use stream::{
    create_stream_context, is_active, lock_view, start_stream_worker, stop_stream_worker,
    stream_stats, unlock_view, update_camera, update_transform, with_visible_points, PointRecord,
    SharedStreamContext, StreamContext, StreamStats,
};

pub use config::ViewerConfig;
