use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxelError};
use crate::tree::LEAF_DIM;

/// How a copy between dense and sparse storage is scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Run on the calling thread.
    Serial,
    /// Fork-join over sub-boxes on the rayon pool.
    #[default]
    Parallel,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Serial => write!(f, "serial"),
            ExecutionMode::Parallel => write!(f, "parallel"),
        }
    }
}

/// Parameters for [`copy_to_dense`](crate::tools::copy_to_dense) and
/// [`copy_from_dense`](crate::tools::copy_from_dense).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub mode: ExecutionMode,
    /// Sub-boxes stop splitting once their extent along the split axis is at
    /// most this many voxels. Split planes are snapped to leaf boundaries, so values below
    /// the leaf edge behave like the leaf edge.
    pub grain_size: i32,
    /// Worker thread count for a dedicated pool (default: the global pool).
    pub threads: Option<usize>,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            grain_size: LEAF_DIM,
            threads: None,
        }
    }
}

impl CopyConfig {
    pub fn serial() -> Self {
        Self {
            mode: ExecutionMode::Serial,
            ..Default::default()
        }
    }

    pub fn parallel() -> Self {
        Self::default()
    }

    pub fn is_serial(&self) -> bool {
        self.mode == ExecutionMode::Serial
    }

    pub fn validate(&self) -> Result<()> {
        if self.grain_size < 1 {
            return Err(VoxelError::Config(format!(
                "grain size must be at least 1, got {}",
                self.grain_size
            )));
        }
        if self.threads == Some(0) {
            return Err(VoxelError::Config("thread count must be at least 1".into()));
        }
        Ok(())
    }
}
