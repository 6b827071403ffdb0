use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::CopyConfig;
use crate::dense::{Dense, Layout};
use crate::error::Result;
use crate::tree::{LeafNode, Tree};
use crate::types::{CoordBBox, VoxelValue};

use super::split::{BoxSplitter, leaf_tiles};
use super::{CopyStats, run_in_pool};

/// Leaves rebuilt by one worker, ready to be spliced into the tree.
struct StagedLeaves<T> {
    leaves: Vec<LeafNode<T>>,
    activated: u64,
}

impl<T> StagedLeaves<T> {
    fn empty() -> Self {
        Self {
            leaves: Vec::new(),
            activated: 0,
        }
    }

    fn merge(mut self, mut other: Self) -> Self {
        self.leaves.append(&mut other.leaves);
        self.activated += other.activated;
        self
    }
}

/// Write every value of `dense` into `tree`.
///
/// A value within `tolerance` of the tree background (boundary included)
/// leaves its voxel inactive and reset to background; any other value is
/// written and activated. Voxels outside `dense.bbox()` keep their value and
/// active state, including those sharing a leaf with the dense region.
///
/// Work is split on leaf boundaries and each worker rebuilds its own leaves
/// from a private copy, so serial and parallel runs produce identical trees.
pub fn copy_from_dense<T: VoxelValue, L: Layout>(
    dense: &Dense<T, L>,
    tree: &mut Tree<T>,
    tolerance: T,
    config: &CopyConfig,
) -> Result<CopyStats> {
    config.validate()?;
    let start = Instant::now();
    let bbox = dense.bbox();

    info!(
        bbox = %bbox,
        layout = %L::MEMORY_LAYOUT,
        mode = %config.mode,
        "Copying dense grid into tree"
    );

    let staged = {
        let source: &Tree<T> = tree;
        if config.is_serial() {
            stage_leaves(dense, source, bbox, tolerance)
        } else {
            let splitter = BoxSplitter::longest(config.grain_size);
            run_in_pool(config, || {
                rayon::iter::split(bbox, |b| splitter.split_box(b))
                    .map(|sub| stage_leaves(dense, source, sub, tolerance))
                    .reduce(StagedLeaves::empty, StagedLeaves::merge)
            })?
        }
    };

    let leaf_count = staged.leaves.len();
    let pruned = splice_leaves(tree, staged.leaves);
    debug!(leaves = leaf_count, pruned, "Spliced staged leaves");

    let stats = CopyStats {
        voxel_count: bbox.volume(),
        active_count: staged.activated,
        leaf_count,
        duration: start.elapsed(),
    };
    info!(
        voxels = stats.voxel_count,
        activated = stats.active_count,
        leaves = stats.leaf_count,
        elapsed = ?stats.duration,
        "Tree copy complete"
    );
    Ok(stats)
}

/// Rebuild every leaf overlapping `sub`.
///
/// Each leaf starts as a copy of the tree's current leaf (or a fresh
/// background leaf), which the worker then owns outright: all writes for that
/// leaf land in the copy, and voxels of the leaf outside `sub` are carried
/// over untouched.
fn stage_leaves<T: VoxelValue, L: Layout>(
    dense: &Dense<T, L>,
    tree: &Tree<T>,
    sub: CoordBBox,
    tolerance: T,
) -> StagedLeaves<T> {
    let background = tree.background();
    let mut staged = StagedLeaves::empty();

    for (origin, region) in leaf_tiles(sub) {
        let mut leaf = tree
            .probe_leaf(origin)
            .cloned()
            .unwrap_or_else(|| LeafNode::new(origin, background));

        for xyz in region {
            let value = dense.get_value(xyz);
            if value.is_approx_equal(&background, &tolerance) {
                leaf.set_value_off(xyz, background);
            } else {
                leaf.set_value_on(xyz, value);
                staged.activated += 1;
            }
        }
        staged.leaves.push(leaf);
    }

    debug!(bbox = %sub, leaves = staged.leaves.len(), "Staged sub-box");
    staged
}

/// Replace the tree's leaves with the staged ones. Leaves left holding only
/// inactive background are removed instead. Returns how many were removed.
fn splice_leaves<T: VoxelValue>(tree: &mut Tree<T>, leaves: Vec<LeafNode<T>>) -> usize {
    let background = tree.background();
    let mut pruned = 0;
    for leaf in leaves {
        if leaf.is_inactive_background(background) {
            if tree.remove_leaf(leaf.origin()).is_some() {
                pruned += 1;
            }
        } else {
            tree.add_leaf(leaf);
        }
    }
    pruned
}
