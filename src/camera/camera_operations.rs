//! Camera operations - Pure DOP functions
//!
//! All functions are pure: they take data, return new data, no side effects.
//! No methods, no self, just transformations.
//!
//! Every mutating operation routes through `refresh_derived`, so the basis
//! vectors and frustum planes a camera carries never lag behind its pose.

use super::camera_data::{CameraConfig, CameraData, Movement};
use super::frustum::{Frustum, FrustumCorners};
use crate::stream::PointRecord;
use cgmath::{Deg, InnerSpace, Matrix4, Point3, Vector3};

/// Pitch never reaches the poles; keeps the basis well-defined
const PITCH_LIMIT_DEGREES: f32 = 89.9;

/// Color stamped on frustum outline vertices
pub const FRUSTUM_OUTLINE_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize camera at a pose, defaults for everything else
pub fn init_camera(position: Point3<f32>, yaw_degrees: f32, pitch_degrees: f32) -> CameraData {
    let config = CameraConfig {
        initial_position: position.into(),
        initial_yaw_degrees: yaw_degrees,
        initial_pitch_degrees: pitch_degrees,
        ..Default::default()
    };
    init_camera_from_config(&config)
}

/// Initialize camera from config
pub fn init_camera_from_config(config: &CameraConfig) -> CameraData {
    let camera = CameraData {
        position: Point3::from(config.initial_position),
        world_up: Vector3::unit_y(),
        yaw_degrees: config.initial_yaw_degrees,
        pitch_degrees: config
            .initial_pitch_degrees
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES),
        fov_degrees: config.fov_degrees,
        aspect_ratio: config.aspect_ratio,
        near_plane: config.near_plane,
        far_plane: config.far_plane,
        movement_speed: config.movement_speed,
        rotation_sensitivity: config.rotation_sensitivity,
        front: -Vector3::unit_z(),
        right: Vector3::unit_x(),
        up: Vector3::unit_y(),
        frustum: Frustum::default(),
    };
    refresh_derived(&camera)
}

// ============================================================================
// DERIVED STATE
// ============================================================================

/// Recompute basis vectors and frustum planes from the primary pose fields
pub fn refresh_derived(camera: &CameraData) -> CameraData {
    let front = forward_from_angles(camera.yaw_degrees, camera.pitch_degrees);
    let right = front.cross(camera.world_up).normalize();
    let up = right.cross(front).normalize();

    let corners = frustum_corners(camera, front, right, up);

    CameraData {
        front,
        right,
        up,
        frustum: Frustum::from_corners(corners),
        ..*camera
    }
}

/// Corner rectangles of the near and far clip planes for the current pose
fn frustum_corners(
    camera: &CameraData,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
) -> FrustumCorners {
    let half_fov_tan = (camera.fov_degrees.to_radians() / 2.0).tan();
    let near_height = 2.0 * half_fov_tan * camera.near_plane;
    let near_width = near_height * camera.aspect_ratio;
    let far_height = 2.0 * half_fov_tan * camera.far_plane;
    let far_width = far_height * camera.aspect_ratio;

    let near_center = camera.position + front * camera.near_plane;
    let far_center = camera.position + front * camera.far_plane;

    let near_top_left = near_center + up * (near_height / 2.0) - right * (near_width / 2.0);
    let near_top_right = near_top_left + right * near_width;
    let near_bottom_right = near_top_right - up * near_height;
    let near_bottom_left = near_bottom_right - right * near_width;

    let far_top_left = far_center + up * (far_height / 2.0) - right * (far_width / 2.0);
    let far_top_right = far_top_left + right * far_width;
    let far_bottom_right = far_top_right - up * far_height;
    let far_bottom_left = far_bottom_right - right * far_width;

    FrustumCorners {
        near_top_left,
        near_top_right,
        near_bottom_left,
        near_bottom_right,
        far_top_left,
        far_top_right,
        far_bottom_left,
        far_bottom_right,
    }
}

// ============================================================================
// MOVEMENT
// ============================================================================

/// Apply one movement input for an elapsed time slice
pub fn process_movement(
    camera: &CameraData,
    direction: Movement,
    delta_seconds: f32,
) -> CameraData {
    let velocity = camera.movement_speed * delta_seconds;
    let mut new_camera = *camera;
    match direction {
        Movement::Forward => new_camera.position += camera.front * velocity,
        Movement::Backward => new_camera.position -= camera.front * velocity,
        Movement::Left => new_camera.position -= camera.right * velocity,
        Movement::Right => new_camera.position += camera.right * velocity,
        Movement::Up => new_camera.position += camera.world_up * velocity,
        Movement::Down => new_camera.position -= camera.world_up * velocity,
    }
    refresh_derived(&new_camera)
}

/// Apply a mouse-look delta in pixels
pub fn process_mouse_look(camera: &CameraData, dx_pixels: f32, dy_pixels: f32) -> CameraData {
    let mut new_camera = *camera;
    new_camera.yaw_degrees += dx_pixels * camera.rotation_sensitivity;
    new_camera.pitch_degrees = (camera.pitch_degrees + dy_pixels * camera.rotation_sensitivity)
        .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    refresh_derived(&new_camera)
}

/// Overwrite the position (scripted moves, benchmark paths)
pub fn set_position(camera: &CameraData, position: Point3<f32>) -> CameraData {
    let mut new_camera = *camera;
    new_camera.position = position;
    refresh_derived(&new_camera)
}

/// Update aspect ratio (e.g., on window resize)
pub fn update_aspect_ratio(camera: &CameraData, width: u32, height: u32) -> CameraData {
    let mut new_camera = *camera;
    new_camera.aspect_ratio = width as f32 / height as f32;
    refresh_derived(&new_camera)
}

// ============================================================================
// VIEW/PROJECTION MATRICES
// ============================================================================

/// Build view matrix from camera data
pub fn build_view_matrix(camera: &CameraData) -> Matrix4<f32> {
    Matrix4::look_at_rh(camera.position, camera.position + camera.front, camera.up)
}

/// Build projection matrix from camera data
pub fn build_projection_matrix(camera: &CameraData) -> Matrix4<f32> {
    cgmath::perspective(
        Deg(camera.fov_degrees),
        camera.aspect_ratio,
        camera.near_plane,
        camera.far_plane,
    )
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Euclidean distance from the camera to a world-space point
pub fn distance_to(camera: &CameraData, point: Point3<f32>) -> f32 {
    (point - camera.position).magnitude()
}

/// Calculate forward vector from yaw and pitch (degrees)
pub fn forward_from_angles(yaw_degrees: f32, pitch_degrees: f32) -> Vector3<f32> {
    let yaw = yaw_degrees.to_radians();
    let pitch = pitch_degrees.to_radians();
    Vector3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// The eight frustum corners as drawable records (locked-view outline)
pub fn frustum_outline_records(camera: &CameraData) -> [PointRecord; 8] {
    camera.frustum.corners.to_array().map(|corner| PointRecord {
        position: corner.into(),
        color: FRUSTUM_OUTLINE_COLOR,
    })
}

/// Log camera context for debugging
pub fn log_camera_context(camera: &CameraData) {
    log::debug!(
        "[Camera] Position: ({:.2}, {:.2}, {:.2}) | Yaw: {:.1}° | Pitch: {:.1}°",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.yaw_degrees,
        camera.pitch_degrees
    );
    log::debug!(
        "[Camera] FOV: {:.1}° | Aspect: {:.3} | Near: {} | Far: {}",
        camera.fov_degrees,
        camera.aspect_ratio,
        camera.near_plane,
        camera.far_plane
    );
}
