pub mod bbox;
pub mod coord;
pub mod value;

pub use bbox::{CoordBBox, CoordIter};
pub use coord::Coord;
pub use value::VoxelValue;
