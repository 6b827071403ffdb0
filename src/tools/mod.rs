pub mod gather;
pub mod scatter;
pub(crate) mod split;

use std::time::Duration;

use crate::config::CopyConfig;
use crate::error::{Result, VoxelError};

pub use gather::copy_to_dense;
pub use scatter::copy_from_dense;

/// Summary of a completed dense <-> sparse copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    /// Voxels visited (the dense grid's value count).
    pub voxel_count: u64,
    /// Gather: voxels that were active in the source tree.
    /// Scatter: voxels activated in the target tree.
    pub active_count: u64,
    /// Scatter: leaves written back into the tree. Zero for gathers.
    pub leaf_count: usize,
    pub duration: Duration,
}

/// Run `op` on a dedicated pool when `config.threads` is set, otherwise on
/// the current (usually global) rayon pool.
fn run_in_pool<R, F>(config: &CopyConfig, op: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| VoxelError::ThreadPool(e.to_string()))?;
            Ok(pool.install(op))
        }
        None => Ok(op()),
    }
}
