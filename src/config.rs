//! Viewer configuration
//!
//! TOML-backed settings covering the cloud file locations, camera start
//! pose, LOD tuning, and model placement. Every section falls back to the
//! engine defaults, so a configuration only needs to name what it changes.

use crate::camera::CameraConfig;
use crate::error::{EngineError, EngineResult};
use crate::traversal::{
    LodThresholds, ModelTransform, TraversalConfig, DEFAULT_LOD_FACTOR, DEFAULT_OVERVIEW_DEPTH,
    DEFAULT_POINT_COLOR,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cloud file locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudPaths {
    /// Hierarchy file
    pub tree: PathBuf,
    /// Point position file
    pub points: PathBuf,
}

/// LOD tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LodSettings {
    pub enabled: bool,
    pub factor: f32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: DEFAULT_LOD_FACTOR,
        }
    }
}

/// Model placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    pub scale: f32,
    pub rotation_degrees: [f32; 3],
    pub translation: [f32; 3],
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_degrees: [0.0; 3],
            translation: [0.0; 3],
        }
    }
}

/// Top-level viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Depth cap for the startup overview
    pub overview_depth: u32,

    /// Buffer capacity override; sized from the hierarchy when unset
    pub buffer_capacity: Option<usize>,

    /// Cloud file locations
    pub cloud: CloudPaths,

    /// Camera start pose and projection
    pub camera: CameraConfig,

    /// LOD tuning
    pub lod: LodSettings,

    /// Model placement
    pub transform: TransformSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            overview_depth: DEFAULT_OVERVIEW_DEPTH,
            buffer_capacity: None,
            cloud: CloudPaths::default(),
            camera: CameraConfig::default(),
            lod: LodSettings::default(),
            transform: TransformSettings::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> EngineResult<Self> {
        let config: ViewerConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::io(path, source))?;
        let config = Self::from_toml_str(&raw)?;
        log::info!("[Config] loaded {}", path.display());
        Ok(config)
    }

    /// Reject values the engine cannot run with
    ///
    /// The comparisons are written so that NaN fails them too.
    pub fn validate(&self) -> EngineResult<()> {
        if self.cloud.tree.as_os_str().is_empty() {
            return Err(EngineError::InvalidConfig(
                "cloud.tree must name the hierarchy file".to_string(),
            ));
        }
        if self.cloud.points.as_os_str().is_empty() {
            return Err(EngineError::InvalidConfig(
                "cloud.points must name the position file".to_string(),
            ));
        }
        if !(self.lod.factor > 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "lod.factor must exceed 1.0, got {}",
                self.lod.factor
            )));
        }
        if !(self.transform.scale > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "transform.scale must be positive, got {}",
                self.transform.scale
            )));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(EngineError::InvalidConfig(format!(
                "camera.fov_degrees must lie in (0, 180), got {}",
                self.camera.fov_degrees
            )));
        }
        if !(self.camera.aspect_ratio > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "camera.aspect_ratio must be positive, got {}",
                self.camera.aspect_ratio
            )));
        }
        if !(self.camera.near_plane > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "camera.near_plane must be positive, got {}",
                self.camera.near_plane
            )));
        }
        if !(self.camera.far_plane > self.camera.near_plane) {
            return Err(EngineError::InvalidConfig(format!(
                "camera.far_plane ({}) must exceed camera.near_plane ({})",
                self.camera.far_plane, self.camera.near_plane
            )));
        }

        let thresholds = LodThresholds::from_factor(self.lod.factor);
        log::info!(
            "[Config] validated: lod enabled={} fine_cutoff={:.4} coarse_cutoff={:.4} overview_depth={}",
            self.lod.enabled,
            thresholds.fine_cutoff,
            thresholds.coarse_cutoff,
            self.overview_depth
        );
        Ok(())
    }

    /// Model transform described by the `[transform]` section
    pub fn model_transform(&self) -> ModelTransform {
        ModelTransform::from_parts(
            self.transform.scale,
            self.transform.rotation_degrees,
            self.transform.translation,
        )
    }

    /// Pass parameters described by the `[lod]` section
    pub fn traversal_config(&self) -> TraversalConfig {
        TraversalConfig {
            lod_enabled: self.lod.enabled,
            thresholds: LodThresholds::from_factor(self.lod.factor),
            point_color: DEFAULT_POINT_COLOR,
        }
    }
}
