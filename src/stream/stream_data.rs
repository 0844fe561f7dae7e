//! Stream Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in stream_operations.rs

use crate::camera::CameraData;
use crate::traversal::{ModelTransform, TraversalConfig};
use bytemuck::{Pod, Zeroable};
use parking_lot::{Mutex, RwLock};
use static_assertions::const_assert_eq;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// One streamed point, laid out for direct vertex upload
///
/// A filled buffer can be handed to a renderer as raw bytes through
/// `bytemuck::cast_slice` without copying.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointRecord {
    /// World-space position
    pub position: [f32; 3],
    /// RGB color in [0, 1]
    pub color: [f32; 3],
}

const_assert_eq!(std::mem::size_of::<PointRecord>(), 24);

/// One half of the double buffer; fully overwritten by each pass
pub struct PointBuffer {
    /// Records written by the most recent pass into this half
    pub records: Vec<PointRecord>,
}

impl PointBuffer {
    /// Preallocate for the hierarchy's worst-case record count
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }
}

/// Double buffer between the worker and consumers
///
/// Each half carries its own lock; the worker holds at most one at a time.
pub struct StreamBuffers {
    /// Half consumers try first
    pub front: Mutex<PointBuffer>,
    /// Half consumers fall back to while the worker holds the front
    pub back: Mutex<PointBuffer>,
}

/// Rolling pass statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamStats {
    pub passes: u64,
    pub last_point_count: usize,
    pub max_point_count: usize,
    pub last_pass_seconds: f64,
    pub avg_pass_seconds: f64,
}

/// Shared state for one streaming session
///
/// Every piece of mutable streaming state lives behind its own lock or
/// atomic; the context as a whole crosses threads behind an `Arc`.
pub struct StreamContext {
    /// Camera pose snapshotted at the start of every pass
    pub camera: RwLock<CameraData>,

    /// Model transform snapshotted at the start of every pass
    pub transform: RwLock<ModelTransform>,

    /// Double buffer the worker fills
    pub buffers: StreamBuffers,

    /// Cleared to wind the worker down
    pub active: AtomicBool,

    /// Set while a consumer holds the view frozen
    pub paused: AtomicBool,

    /// Pass parameters, fixed for the context's lifetime
    pub config: TraversalConfig,

    /// Rolling statistics
    pub stats: Mutex<StreamStats>,
}

/// Shared handle to a stream context
pub type SharedStreamContext = Arc<StreamContext>;
