use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::CopyConfig;
use crate::dense::{Dense, Layout};
use crate::error::Result;
use crate::tree::Tree;
use crate::types::{CoordBBox, VoxelValue};

use super::split::BoxSplitter;
use super::{CopyStats, run_in_pool};

/// A sub-box of the dense grid together with the contiguous run of the
/// buffer it owns.
///
/// A slab always spans the full grid on every axis nested inside the one it
/// was last cut along, which is what keeps its values contiguous.
struct Slab<'a, T> {
    bbox: CoordBBox,
    values: &'a mut [T],
}

impl<T> Slab<'_, T> {
    /// Cut across the slowest-varying axis of `axis_order` on which the slab
    /// is more than one voxel thick. Rows along that axis are `strides[axis]`
    /// values apart, so both halves keep a contiguous run of the buffer.
    fn split(self, grain: i32, axis_order: [usize; 3], strides: [usize; 3]) -> (Self, Option<Self>) {
        let dim = self.bbox.dim();
        let Some(axis) = axis_order.into_iter().find(|&a| dim[a] > 1) else {
            return (self, None);
        };
        match BoxSplitter::fixed(axis, grain).split(&self.bbox) {
            Some((left, right)) => {
                let rows = left.dim()[axis] as usize;
                let (lv, rv) = self.values.split_at_mut(rows * strides[axis]);
                (
                    Slab {
                        bbox: left,
                        values: lv,
                    },
                    Some(Slab {
                        bbox: right,
                        values: rv,
                    }),
                )
            }
            None => (self, None),
        }
    }
}

/// Sample `tree` at every voxel of `dense.bbox()` into `dense`.
///
/// Active and inactive voxels are copied alike; voxels with no allocated
/// leaf read as the tree background. The tree is never modified and the
/// result does not depend on `config.mode`.
///
/// Parallel work is cut across the layout's slowest axis. A grid that is a
/// single voxel thick there is cut across the next axis instead; one that is
/// a few voxels thick (at most `grain_size`) runs as a single task.
pub fn copy_to_dense<T: VoxelValue, L: Layout>(
    tree: &Tree<T>,
    dense: &mut Dense<T, L>,
    config: &CopyConfig,
) -> Result<CopyStats> {
    config.validate()?;
    let start = Instant::now();
    let bbox = dense.bbox();

    info!(
        bbox = %bbox,
        layout = %L::MEMORY_LAYOUT,
        mode = %config.mode,
        "Copying tree into dense grid"
    );

    let strides = [dense.stride(0), dense.stride(1), dense.stride(2)];
    let slab = Slab {
        bbox,
        values: dense.data_mut(),
    };

    let active_count = if config.is_serial() {
        fill_slab::<T, L>(tree, slab)
    } else {
        let grain = config.grain_size;
        run_in_pool(config, || {
            rayon::iter::split(slab, |s| s.split(grain, L::AXIS_ORDER, strides))
                .map(|s| fill_slab::<T, L>(tree, s))
                .sum::<u64>()
        })?
    };

    let stats = CopyStats {
        voxel_count: bbox.volume(),
        active_count,
        leaf_count: 0,
        duration: start.elapsed(),
    };
    info!(
        voxels = stats.voxel_count,
        active = stats.active_count,
        elapsed = ?stats.duration,
        "Dense copy complete"
    );
    Ok(stats)
}

/// Fill one slab through a private accessor. Returns the number of active
/// source voxels seen.
fn fill_slab<T: VoxelValue, L: Layout>(tree: &Tree<T>, slab: Slab<'_, T>) -> u64 {
    let Slab { bbox, values } = slab;
    debug!(bbox = %bbox, values = values.len(), "Sampling slab");

    let mut acc = tree.accessor();
    let mut n = 0usize;
    let mut active = 0u64;
    L::for_each_coord(&bbox, |xyz| {
        let (value, on) = acc.probe_value(xyz);
        values[n] = value;
        n += 1;
        active += on as u64;
    });
    debug_assert_eq!(n, values.len());
    active
}
