//! Traversal Operations - Pure functions for hierarchy traversal
//!
//! A collection pass walks the sphere hierarchy depth-first and appends
//! visible records to a caller-owned buffer. Passes hold no state of
//! their own; everything they need arrives as arguments, so the same
//! functions serve the stream worker and one-shot callers alike.

use super::traversal_data::{
    LodThresholds, ModelTransform, TraversalConfig, COARSE_LOD_DEPTH, FINE_LOD_DEPTH,
};
use crate::camera::{distance_to, CameraData, Visibility};
use crate::cloud::{NodeRecord, PointStore, SphereTree, TreeOffset};
use crate::error::EngineResult;
use crate::stream::PointRecord;

/// Distance cutoff for a node depth, if the depth falls in a pruned band
///
/// Depths at or above `COARSE_LOD_DEPTH` are never distance-pruned.
pub fn lod_cutoff(depth: u32, thresholds: &LodThresholds) -> Option<f32> {
    if depth > FINE_LOD_DEPTH {
        Some(thresholds.fine_cutoff)
    } else if depth > COARSE_LOD_DEPTH {
        Some(thresholds.coarse_cutoff)
    } else {
        None
    }
}

/// Append every record visible below `offset` to `out`
///
/// Internal spheres are tested in world space against the camera frustum
/// and, when enabled, the distance cutoff for their depth; a failed test
/// drops the whole subtree. Leaves that survive to be reached are copied
/// wholesale without further tests. Returns the number of records
/// appended.
///
/// Offsets should come from a validated hierarchy. Unvalidated input
/// still cannot recurse unboundedly, but a garbage point offset below
/// the header depth will panic in the store.
pub fn collect_visible(
    tree: &SphereTree,
    store: &PointStore,
    camera: &CameraData,
    transform: &ModelTransform,
    config: &TraversalConfig,
    offset: TreeOffset,
    depth: u32,
    out: &mut Vec<PointRecord>,
) -> EngineResult<usize> {
    match tree.node(offset)? {
        NodeRecord::Leaf { points } => {
            for &point in points {
                let world = transform.transform_point(store.position(point));
                out.push(PointRecord {
                    position: world.into(),
                    color: config.point_color,
                });
            }
            Ok(points.len())
        }
        NodeRecord::Internal {
            radius,
            point,
            left,
            right,
        } => {
            // Bounds the recursion even when child offsets cycle
            if depth >= tree.header().max_depth {
                return Ok(0);
            }

            let center = transform.transform_point(store.position(point));
            let world_radius = transform.scaled_radius(radius);

            if camera.frustum.classify_sphere(center, world_radius) == Visibility::Outside {
                return Ok(0);
            }
            if config.lod_enabled {
                if let Some(cutoff) = lod_cutoff(depth, &config.thresholds) {
                    if distance_to(camera, center) - world_radius > cutoff {
                        return Ok(0);
                    }
                }
            }

            out.push(PointRecord {
                position: center.into(),
                color: config.point_color,
            });
            let mut written = 1;
            written +=
                collect_visible(tree, store, camera, transform, config, left, depth + 1, out)?;
            written +=
                collect_visible(tree, store, camera, transform, config, right, depth + 1, out)?;
            Ok(written)
        }
    }
}

/// Append a coarse position-only sketch of the whole hierarchy to `out`
///
/// No visibility tests run here; every internal node down to `depth_cap`
/// contributes its center, and leaves reached on the way contribute their
/// points. Returns the number of positions appended.
pub fn collect_overview(
    tree: &SphereTree,
    store: &PointStore,
    transform: &ModelTransform,
    depth_cap: u32,
    out: &mut Vec<[f32; 3]>,
) -> EngineResult<usize> {
    overview_recursive(tree, store, transform, depth_cap, tree.root(), 0, out)
}

fn overview_recursive(
    tree: &SphereTree,
    store: &PointStore,
    transform: &ModelTransform,
    depth_cap: u32,
    offset: TreeOffset,
    depth: u32,
    out: &mut Vec<[f32; 3]>,
) -> EngineResult<usize> {
    match tree.node(offset)? {
        NodeRecord::Leaf { points } => {
            for &point in points {
                out.push(transform.transform_point(store.position(point)).into());
            }
            Ok(points.len())
        }
        NodeRecord::Internal {
            point, left, right, ..
        } => {
            out.push(transform.transform_point(store.position(point)).into());
            let mut written = 1;
            if depth < depth_cap {
                written +=
                    overview_recursive(tree, store, transform, depth_cap, left, depth + 1, out)?;
                written +=
                    overview_recursive(tree, store, transform, depth_cap, right, depth + 1, out)?;
            }
            Ok(written)
        }
    }
}
