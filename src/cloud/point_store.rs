//! Flat point position storage
//!
//! Positions live in an externally built file of packed little-endian f32
//! triplets; the hierarchy addresses them by float index (the on-disk value
//! is the point index pre-multiplied by 3). Reads after the load-time
//! validation walk are plain indexed loads.

use crate::error::{EngineError, EngineResult};
use bytemuck::{Pod, Zeroable};
use cgmath::Point3;
use memmap2::Mmap;

/// Floats per stored position
pub const FLOATS_PER_POINT: usize = 3;

/// Index into the flat float sequence, as stored in the hierarchy
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PointOffset(pub u32);

/// Backing storage for point positions
pub enum PointSource {
    /// Read-only file mapping
    Mapped(Mmap),
    /// In-memory floats (tests, synthetic clouds)
    Owned(Vec<f32>),
}

/// Position store addressed by hierarchy point offsets
pub struct PointStore {
    source: PointSource,
}

impl PointStore {
    pub fn new(source: PointSource) -> EngineResult<Self> {
        if let PointSource::Mapped(map) = &source {
            if map.len() % std::mem::size_of::<f32>() != 0 {
                return Err(EngineError::CorruptedData(format!(
                    "position data is {} bytes, not a whole number of floats",
                    map.len()
                )));
            }
        }
        let store = Self { source };
        if store.float_len() % FLOATS_PER_POINT != 0 {
            return Err(EngineError::CorruptedData(format!(
                "position data holds {} floats, not a whole number of points",
                store.float_len()
            )));
        }
        Ok(store)
    }

    /// Wrap an in-memory float sequence
    pub fn from_floats(floats: Vec<f32>) -> EngineResult<Self> {
        Self::new(PointSource::Owned(floats))
    }

    /// View of the raw float sequence
    pub fn floats(&self) -> &[f32] {
        match &self.source {
            PointSource::Mapped(map) => bytemuck::cast_slice(&map[..]),
            PointSource::Owned(floats) => floats,
        }
    }

    pub fn float_len(&self) -> usize {
        self.floats().len()
    }

    pub fn point_count(&self) -> usize {
        self.float_len() / FLOATS_PER_POINT
    }

    /// Range check used by the load-time validation walk
    pub fn contains(&self, offset: PointOffset) -> bool {
        offset.0 as usize + FLOATS_PER_POINT <= self.float_len()
    }

    /// Read one position. Offsets must come from a validated hierarchy; an
    /// out-of-range offset is a violated precondition and panics.
    pub fn position(&self, offset: PointOffset) -> Point3<f32> {
        let at = offset.0 as usize;
        let floats = self.floats();
        Point3::new(floats[at], floats[at + 1], floats[at + 2])
    }
}
