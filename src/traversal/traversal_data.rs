//! Traversal Data - Pure data structures for hierarchy traversal
//!
//! Parameters that shape a collection pass: distance cutoffs per depth
//! band, the model transform applied to every stored position, and the
//! color stamped on emitted records.

use cgmath::{Deg, Matrix4, Point3, Transform, Vector3};

// ============================================================================
// Constants
// ============================================================================

/// Depth past which the fine distance cutoff applies
pub const FINE_LOD_DEPTH: u32 = 18;

/// Depth past which the coarse distance cutoff applies
pub const COARSE_LOD_DEPTH: u32 = 14;

/// Detail factor used when no override is configured
pub const DEFAULT_LOD_FACTOR: f32 = 1.9;

/// Color stamped on every record a pass emits
pub const DEFAULT_POINT_COLOR: [f32; 3] = [0.0, 1.0, 0.0];

/// Depth cap for the coarse overview pass
pub const DEFAULT_OVERVIEW_DEPTH: u32 = 14;

// ============================================================================
// Level-of-Detail Thresholds
// ============================================================================

/// Distance cutoffs derived from a single detail factor
///
/// Deeper nodes carry finer detail and must sit closer to the camera to
/// survive a pass. Raising the factor keeps detail visible further out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodThresholds {
    /// Cutoff for nodes deeper than `FINE_LOD_DEPTH`
    pub fine_cutoff: f32,
    /// Cutoff for nodes deeper than `COARSE_LOD_DEPTH`
    pub coarse_cutoff: f32,
}

impl LodThresholds {
    /// Derive both cutoffs from one detail factor
    pub fn from_factor(factor: f32) -> Self {
        Self {
            fine_cutoff: factor.powi(4) / 100.0,
            coarse_cutoff: factor.powi(5) / 100.0,
        }
    }
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self::from_factor(DEFAULT_LOD_FACTOR)
    }
}

// ============================================================================
// Traversal Configuration
// ============================================================================

/// Knobs for a collection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalConfig {
    /// Distance-based pruning on/off
    pub lod_enabled: bool,
    /// Cutoffs consulted when pruning is on
    pub thresholds: LodThresholds,
    /// Color written into every emitted record
    pub point_color: [f32; 3],
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            lod_enabled: true,
            thresholds: LodThresholds::default(),
            point_color: DEFAULT_POINT_COLOR,
        }
    }
}

// ============================================================================
// Model Transform
// ============================================================================

/// Model-to-world transform applied to every stored position
///
/// Stored positions and radii are model-space. Passes move them into world
/// space before any visibility test, so culling and the emitted records
/// always agree. The uniform scale is kept alongside the matrix because
/// sphere radii scale by it directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    /// Full model matrix
    pub matrix: Matrix4<f32>,
    /// Uniform scale baked into `matrix`
    pub scale: f32,
}

impl ModelTransform {
    /// Identity transform; stored positions are already world-space
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::from_scale(1.0),
            scale: 1.0,
        }
    }

    /// Compose scale, per-axis rotation (degrees), and translation
    ///
    /// Translation applies first, then the rotations in Z/Y/X order, then
    /// the uniform scale.
    pub fn from_parts(scale: f32, rotation_degrees: [f32; 3], translation: [f32; 3]) -> Self {
        let matrix = Matrix4::from_scale(scale)
            * Matrix4::from_angle_x(Deg(rotation_degrees[0]))
            * Matrix4::from_angle_y(Deg(rotation_degrees[1]))
            * Matrix4::from_angle_z(Deg(rotation_degrees[2]))
            * Matrix4::from_translation(Vector3::from(translation));
        Self { matrix, scale }
    }

    /// Move a stored position into world space
    pub fn transform_point(&self, point: Point3<f32>) -> Point3<f32> {
        self.matrix.transform_point(point)
    }

    /// World-space radius of a model-space sphere
    pub fn scaled_radius(&self, radius: f32) -> f32 {
        radius * self.scale
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::identity()
    }
}
