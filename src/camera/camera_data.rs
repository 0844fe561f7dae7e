//! Camera data structures - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in camera_operations.rs

use super::frustum::Frustum;
use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Movement directions, decoupled from any windowing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Camera data structure - pure data, no methods
///
/// Build one through `init_camera`/`init_camera_from_config`; the derived
/// fields at the bottom are kept in sync by the operations, so a camera
/// obtained from an operation always carries planes matching its pose.
#[derive(Debug, Clone, Copy)]
pub struct CameraData {
    /// Camera position in world space
    pub position: Point3<f32>,

    /// World up axis, used for the basis and vertical movement
    pub world_up: Vector3<f32>,

    /// Yaw rotation (degrees, around the world up axis)
    pub yaw_degrees: f32,

    /// Pitch rotation (degrees, clamped short of the poles)
    pub pitch_degrees: f32,

    /// Field of view (vertical, degrees)
    pub fov_degrees: f32,

    /// Aspect ratio (width / height)
    pub aspect_ratio: f32,

    /// Near clipping plane distance
    pub near_plane: f32,

    /// Far clipping plane distance
    pub far_plane: f32,

    /// Movement speed (world units per second)
    pub movement_speed: f32,

    /// Rotation sensitivity (degrees per pixel)
    pub rotation_sensitivity: f32,

    /// Forward basis vector, derived from yaw/pitch
    pub front: Vector3<f32>,

    /// Right basis vector, derived
    pub right: Vector3<f32>,

    /// Up basis vector, derived
    pub up: Vector3<f32>,

    /// View frustum planes and corners, derived from the full pose
    pub frustum: Frustum,
}

/// Camera configuration for initialization
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub initial_position: [f32; 3],
    pub initial_yaw_degrees: f32,
    pub initial_pitch_degrees: f32,
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub movement_speed: f32,
    pub rotation_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_position: [0.0, 0.0, 0.0],
            initial_yaw_degrees: -90.0,
            initial_pitch_degrees: 0.0,
            fov_degrees: 45.0,
            aspect_ratio: 800.0 / 600.0,
            near_plane: 0.01,
            far_plane: 100.0,
            movement_speed: 0.2,
            rotation_sensitivity: 0.1,
        }
    }
}
