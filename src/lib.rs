pub mod config;
pub mod dense;
pub mod error;
pub mod tools;
pub mod tree;
pub mod types;

pub use config::{CopyConfig, ExecutionMode};
pub use dense::{Dense, Layout, LayoutXyz, LayoutZyx, MemoryLayout};
pub use error::{Result, VoxelError};
pub use tools::{CopyStats, copy_from_dense, copy_to_dense};
pub use tree::{LeafNode, Tree, ValueAccessor};
pub use types::{Coord, CoordBBox, VoxelValue};
