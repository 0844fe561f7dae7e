//! Sphere-bounded binary hierarchy over the point store
//!
//! The hierarchy is a flat sequence of little-endian 4-byte words, built
//! offline and consumed read-only:
//!
//! ```text
//! word 0   maximum traversal depth
//! word 1   total point count
//! word 2   bounding volume tag (0 = sphere; the only supported kind)
//! word 3.. node records, addressed by absolute word offset
//! ```
//!
//! An internal node is four words: an f32 bounding radius (always > 0),
//! the representative point offset, then the left and right child word
//! offsets. A leaf starts with a non-positive f32 sentinel, a point count,
//! and that many point offsets. The sign of the first word is the only
//! node/leaf discriminator.
//!
//! `node` performs bounds-checked field reads; `validate` walks the whole
//! structure once at load so the traversal never meets a bad offset.

use super::point_store::{PointOffset, PointStore};
use crate::error::{EngineError, EngineResult};
use bytemuck::{Pod, Zeroable};
use memmap2::Mmap;

/// Words before the first node record
pub const HEADER_WORDS: u32 = 3;

/// Upper bound on plausible header depths; a binary hierarchy this deep
/// would outgrow any real file, so a larger value means a corrupt header
pub const MAX_TREE_DEPTH: u32 = 64;

/// Bounding volume tags understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundingVolume {
    Sphere,
    Aabb,
    None,
    SplitPlane,
}

impl BoundingVolume {
    fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::Sphere),
            1 => Some(Self::Aabb),
            2 => Some(Self::None),
            3 => Some(Self::SplitPlane),
            _ => None,
        }
    }
}

/// Word offset of a node record within the hierarchy
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct TreeOffset(pub u32);

/// Parsed hierarchy header
#[derive(Debug, Clone, Copy)]
pub struct TreeHeader {
    pub max_depth: u32,
    pub element_count: u32,
    pub bounding_volume: BoundingVolume,
}

/// Decoded node record; leaves borrow their point list straight from the words
#[derive(Debug, Clone, Copy)]
pub enum NodeRecord<'t> {
    Internal {
        radius: f32,
        point: PointOffset,
        left: TreeOffset,
        right: TreeOffset,
    },
    Leaf {
        points: &'t [PointOffset],
    },
}

/// Backing storage for the hierarchy words
pub enum TreeSource {
    /// Read-only file mapping
    Mapped(Mmap),
    /// In-memory words (tests, synthetic hierarchies)
    Owned(Vec<u32>),
}

/// Statistics gathered by the validation walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeSummary {
    pub internal_nodes: u64,
    pub leaf_nodes: u64,
    pub leaf_points: u64,
    /// Deepest node observed (root is depth 0)
    pub deepest: u32,
    /// Worst-case records one pass can emit: every leaf point plus one
    /// record per internal node under the depth cap. Buffers sized to this
    /// never grow mid-pass.
    pub max_record_count: u64,
}

/// Read-only handle over a validated-format hierarchy
pub struct SphereTree {
    source: TreeSource,
    header: TreeHeader,
}

fn out_of_bounds(offset: TreeOffset, extent: usize) -> EngineError {
    EngineError::NodeOutOfBounds {
        offset: offset.0,
        extent,
    }
}

impl SphereTree {
    /// Parse the header and sanity-check the mapping. Structural checks
    /// (child offsets, leaf extents, point offsets) happen in `validate`.
    pub fn new(source: TreeSource) -> EngineResult<Self> {
        if let TreeSource::Mapped(map) = &source {
            if map.len() % std::mem::size_of::<u32>() != 0 {
                return Err(EngineError::InvalidHeader(format!(
                    "hierarchy is {} bytes, not a whole number of words",
                    map.len()
                )));
            }
        }

        let words = match &source {
            TreeSource::Mapped(map) => bytemuck::cast_slice(&map[..]),
            TreeSource::Owned(words) => words.as_slice(),
        };
        if words.len() <= HEADER_WORDS as usize {
            return Err(EngineError::InvalidHeader(format!(
                "{} words is too short to hold a header and a root node",
                words.len()
            )));
        }

        let max_depth = words[0];
        if max_depth == 0 || max_depth > MAX_TREE_DEPTH {
            return Err(EngineError::InvalidHeader(format!(
                "implausible maximum depth {}",
                max_depth
            )));
        }

        let tag = words[2];
        let bounding_volume = BoundingVolume::from_tag(tag)
            .ok_or(EngineError::UnsupportedBoundingVolume(tag))?;
        if bounding_volume != BoundingVolume::Sphere {
            return Err(EngineError::UnsupportedBoundingVolume(tag));
        }

        let header = TreeHeader {
            max_depth,
            element_count: words[1],
            bounding_volume,
        };
        Ok(Self { source, header })
    }

    /// View of the raw word sequence
    pub fn words(&self) -> &[u32] {
        match &self.source {
            TreeSource::Mapped(map) => bytemuck::cast_slice(&map[..]),
            TreeSource::Owned(words) => words,
        }
    }

    pub fn header(&self) -> &TreeHeader {
        &self.header
    }

    /// The root node sits immediately after the header
    pub fn root(&self) -> TreeOffset {
        TreeOffset(HEADER_WORDS)
    }

    /// Decode the node record at a word offset with bounds-checked reads
    pub fn node(&self, offset: TreeOffset) -> EngineResult<NodeRecord<'_>> {
        let words = self.words();
        let at = offset.0 as usize;

        let first = *words
            .get(at)
            .ok_or_else(|| out_of_bounds(offset, words.len()))?;
        let discriminator = f32::from_bits(first);

        if discriminator > 0.0 {
            let rest = words
                .get(at + 1..at + 4)
                .ok_or_else(|| out_of_bounds(offset, words.len()))?;
            Ok(NodeRecord::Internal {
                radius: discriminator,
                point: PointOffset(rest[0]),
                left: TreeOffset(rest[1]),
                right: TreeOffset(rest[2]),
            })
        } else {
            let count = *words
                .get(at + 1)
                .ok_or_else(|| out_of_bounds(offset, words.len()))?
                as usize;
            let start = at + 2;
            let points = start
                .checked_add(count)
                .and_then(|end| words.get(start..end))
                .ok_or_else(|| out_of_bounds(offset, words.len()))?;
            Ok(NodeRecord::Leaf {
                points: bytemuck::cast_slice(points),
            })
        }
    }

    /// Walk the whole hierarchy once, checking every reachable offset
    /// against the mapped extents and every point offset against `store`.
    /// Returns the summary the buffer sizing contract is built on.
    pub fn validate(&self, store: &PointStore) -> EngineResult<TreeSummary> {
        if self.header.element_count as usize != store.point_count() {
            log::warn!(
                "[SphereTree] header point count {} != mapped point count {}",
                self.header.element_count,
                store.point_count()
            );
        }

        let mut summary = TreeSummary::default();
        self.validate_recursive(store, self.root(), 0, &mut summary)?;

        log::info!(
            "[SphereTree] validated: {} internal nodes, {} leaves, {} leaf points, deepest {} (cap {}), worst-case pass {} records",
            summary.internal_nodes,
            summary.leaf_nodes,
            summary.leaf_points,
            summary.deepest,
            self.header.max_depth,
            summary.max_record_count
        );
        Ok(summary)
    }

    fn validate_recursive(
        &self,
        store: &PointStore,
        offset: TreeOffset,
        depth: u32,
        summary: &mut TreeSummary,
    ) -> EngineResult<()> {
        // A correct header depth bounds every node; this also breaks cycles
        if depth >= self.header.max_depth {
            return Err(EngineError::DepthExceeded {
                depth,
                max_depth: self.header.max_depth,
            });
        }
        summary.deepest = summary.deepest.max(depth);

        match self.node(offset)? {
            NodeRecord::Internal {
                radius,
                point,
                left,
                right,
            } => {
                if !radius.is_finite() {
                    return Err(EngineError::CorruptedData(format!(
                        "non-finite radius at word {}",
                        offset.0
                    )));
                }
                if !store.contains(point) {
                    return Err(EngineError::PointOutOfBounds {
                        offset: point.0,
                        extent: store.float_len(),
                    });
                }
                summary.internal_nodes += 1;
                summary.max_record_count += 1;
                self.validate_recursive(store, left, depth + 1, summary)?;
                self.validate_recursive(store, right, depth + 1, summary)
            }
            NodeRecord::Leaf { points } => {
                for &point in points {
                    if !store.contains(point) {
                        return Err(EngineError::PointOutOfBounds {
                            offset: point.0,
                            extent: store.float_len(),
                        });
                    }
                }
                summary.leaf_nodes += 1;
                summary.leaf_points += points.len() as u64;
                summary.max_record_count += points.len() as u64;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-word header values: depth cap and point count; sphere tag
    fn words_with_header(max_depth: u32, point_count: u32, nodes: &[u32]) -> Vec<u32> {
        let mut words = vec![max_depth, point_count, 0];
        words.extend_from_slice(nodes);
        words
    }

    fn five_point_store() -> PointStore {
        let mut floats = Vec::new();
        for i in 0..5 {
            floats.extend_from_slice(&[i as f32, 0.0, 0.0]);
        }
        PointStore::from_floats(floats).expect("Failed to create point store")
    }

    /// Root internal node with two leaves of two points each
    fn two_leaf_words() -> Vec<u32> {
        let mut words = vec![2, 5, 0];
        words.extend_from_slice(&[2.0f32.to_bits(), 0, 7, 11]); // root: radius 2, rep point 0
        words.extend_from_slice(&[0, 2, 3, 6]); // left leaf: points 1 and 2
        words.extend_from_slice(&[0, 2, 9, 12]); // right leaf: points 3 and 4
        words
    }

    #[test]
    fn test_header_parse() {
        let tree =
            SphereTree::new(TreeSource::Owned(two_leaf_words())).expect("Failed to parse tree");
        assert_eq!(tree.header().max_depth, 2);
        assert_eq!(tree.header().element_count, 5);
        assert_eq!(tree.header().bounding_volume, BoundingVolume::Sphere);
        assert_eq!(tree.root(), TreeOffset(3));
    }

    #[test]
    fn test_node_decode_internal_and_leaf() {
        let tree =
            SphereTree::new(TreeSource::Owned(two_leaf_words())).expect("Failed to parse tree");
        match tree.node(tree.root()).expect("Failed to decode root") {
            NodeRecord::Internal {
                radius,
                point,
                left,
                right,
            } => {
                assert_eq!(radius, 2.0);
                assert_eq!(point, PointOffset(0));
                assert_eq!(left, TreeOffset(7));
                assert_eq!(right, TreeOffset(11));
            }
            NodeRecord::Leaf { .. } => panic!("root decoded as leaf"),
        }
        match tree.node(TreeOffset(7)).expect("Failed to decode leaf") {
            NodeRecord::Leaf { points } => {
                assert_eq!(points, &[PointOffset(3), PointOffset(6)]);
            }
            NodeRecord::Internal { .. } => panic!("leaf decoded as internal"),
        }
    }

    #[test]
    fn test_validate_counts_nodes_and_sizes_buffers() {
        let tree =
            SphereTree::new(TreeSource::Owned(two_leaf_words())).expect("Failed to parse tree");
        let summary = tree
            .validate(&five_point_store())
            .expect("Failed to validate tree");
        assert_eq!(summary.internal_nodes, 1);
        assert_eq!(summary.leaf_nodes, 2);
        assert_eq!(summary.leaf_points, 4);
        assert_eq!(summary.deepest, 1);
        // One emitting internal node plus every leaf point
        assert_eq!(summary.max_record_count, 5);
    }

    #[test]
    fn test_unsupported_bounding_volume_rejected() {
        let mut words = two_leaf_words();
        words[2] = 1; // aabb
        match SphereTree::new(TreeSource::Owned(words)) {
            Err(EngineError::UnsupportedBoundingVolume(1)) => {}
            other => panic!("expected unsupported bounding volume, got {:?}", other.err()),
        }

        let mut words = two_leaf_words();
        words[2] = 9; // unknown tag
        assert!(matches!(
            SphereTree::new(TreeSource::Owned(words)),
            Err(EngineError::UnsupportedBoundingVolume(9))
        ));
    }

    #[test]
    fn test_implausible_depth_rejected() {
        let mut words = two_leaf_words();
        words[0] = 0;
        assert!(matches!(
            SphereTree::new(TreeSource::Owned(words)),
            Err(EngineError::InvalidHeader(_))
        ));

        let mut words = two_leaf_words();
        words[0] = u32::MAX;
        assert!(matches!(
            SphereTree::new(TreeSource::Owned(words)),
            Err(EngineError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_child_offset_past_extent_fails_validation() {
        // Right child offset 900 points past the mapping
        let mut words = two_leaf_words();
        words[6] = 900;
        let tree = SphereTree::new(TreeSource::Owned(words)).expect("Failed to parse tree");
        assert!(matches!(
            tree.validate(&five_point_store()),
            Err(EngineError::NodeOutOfBounds { offset: 900, .. })
        ));
    }

    #[test]
    fn test_leaf_point_offset_past_store_fails_validation() {
        // Second point of the left leaf lands beyond the store
        let mut words = two_leaf_words();
        words[10] = 600;
        let tree = SphereTree::new(TreeSource::Owned(words)).expect("Failed to parse tree");
        assert!(matches!(
            tree.validate(&five_point_store()),
            Err(EngineError::PointOutOfBounds { offset: 600, .. })
        ));
    }

    #[test]
    fn test_cycle_caught_by_depth_cap() {
        // Root's left child offset points back at the root itself
        let mut words = vec![4, 5, 0];
        words.extend_from_slice(&[2.0f32.to_bits(), 0, 3, 8]);
        words.extend_from_slice(&[0, 1, 3]);
        let tree = SphereTree::new(TreeSource::Owned(words)).expect("Failed to parse tree");
        assert!(matches!(
            tree.validate(&five_point_store()),
            Err(EngineError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn test_truncated_leaf_extent_rejected() {
        // Leaf claims more points than the mapping holds
        let words = words_with_header(2, 5, &[0, 50, 3, 6]);
        let tree = SphereTree::new(TreeSource::Owned(words)).expect("Failed to parse tree");
        assert!(matches!(
            tree.node(tree.root()),
            Err(EngineError::NodeOutOfBounds { .. })
        ));
    }
}
