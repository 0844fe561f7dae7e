//! Read-only file mapping for cloud data
//!
//! Both cloud files are mapped rather than read: the hierarchy and point
//! data can exceed memory, and the traversal touches only the parts the
//! camera can see. All failures here are startup-fatal; nothing downstream
//! retries a broken mapping.

use super::point_store::{PointSource, PointStore};
use super::sphere_tree::{SphereTree, TreeSource, TreeSummary};
use crate::error::{EngineError, EngineResult};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

fn map_file(path: &Path) -> EngineResult<Mmap> {
    let file = File::open(path).map_err(|source| EngineError::io(path, source))?;
    // Safety: the mapping is read-only and the cloud files are static once
    // built; callers must not truncate them while the engine runs
    let map = unsafe { Mmap::map(&file) }.map_err(|source| EngineError::io(path, source))?;
    Ok(map)
}

/// Map a hierarchy file
pub fn map_tree(path: impl AsRef<Path>) -> EngineResult<SphereTree> {
    let path = path.as_ref();
    let map = map_file(path)?;
    log::info!(
        "[CloudMapping] mapped hierarchy {} ({} bytes)",
        path.display(),
        map.len()
    );
    SphereTree::new(TreeSource::Mapped(map))
}

/// Map a point position file
pub fn map_points(path: impl AsRef<Path>) -> EngineResult<PointStore> {
    let path = path.as_ref();
    let map = map_file(path)?;
    log::info!(
        "[CloudMapping] mapped positions {} ({} bytes)",
        path.display(),
        map.len()
    );
    PointStore::new(PointSource::Mapped(map))
}

/// Map both cloud files and run the one-time validation walk
pub fn open_cloud(
    tree_path: impl AsRef<Path>,
    points_path: impl AsRef<Path>,
) -> EngineResult<(SphereTree, PointStore, TreeSummary)> {
    let tree = map_tree(tree_path)?;
    let store = map_points(points_path)?;
    let summary = tree.validate(&store)?;
    Ok((tree, store, summary))
}
