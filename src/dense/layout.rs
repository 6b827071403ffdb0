use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Coord, CoordBBox};

/// Which axis varies fastest in a dense buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryLayout {
    /// `k` fastest, `i` slowest: offset = i*xStride + j*yStride + k.
    Zyx,
    /// `i` fastest, `k` slowest: offset = i + j*yStride + k*zStride.
    Xyz,
}

impl fmt::Display for MemoryLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryLayout::Zyx => write!(f, "zyx"),
            MemoryLayout::Xyz => write!(f, "xyz"),
        }
    }
}

/// Compile-time memory layout of a [`Dense`](super::Dense) grid.
///
/// A layout is fully described by the order in which axes nest, from the
/// outermost (largest stride) to the innermost (stride 1).
pub trait Layout: Copy + Default + Send + Sync + 'static {
    const MEMORY_LAYOUT: MemoryLayout;
    /// Axis indices ordered outermost first.
    const AXIS_ORDER: [usize; 3];

    /// Per-axis strides (indexed by axis, not by nesting level).
    fn strides(dim: Coord) -> [usize; 3] {
        let [outer, middle, inner] = Self::AXIS_ORDER;
        let mut strides = [0usize; 3];
        strides[inner] = 1;
        strides[middle] = dim[inner] as usize;
        strides[outer] = dim[inner] as usize * dim[middle] as usize;
        strides
    }

    /// Visit every voxel of `bbox` in this layout's buffer order.
    #[inline]
    fn for_each_coord(bbox: &CoordBBox, mut f: impl FnMut(Coord)) {
        let [a0, a1, a2] = Self::AXIS_ORDER;
        let (min, max) = (bbox.min, bbox.max);
        let mut p = min;
        for u in min[a0]..=max[a0] {
            p[a0] = u;
            for v in min[a1]..=max[a1] {
                p[a1] = v;
                for w in min[a2]..=max[a2] {
                    p[a2] = w;
                    f(p);
                }
            }
        }
    }
}

/// `k`-fastest layout. Default for [`Dense`](super::Dense).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutZyx;

/// `i`-fastest layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutXyz;

impl Layout for LayoutZyx {
    const MEMORY_LAYOUT: MemoryLayout = MemoryLayout::Zyx;
    const AXIS_ORDER: [usize; 3] = [0, 1, 2];
}

impl Layout for LayoutXyz {
    const MEMORY_LAYOUT: MemoryLayout = MemoryLayout::Xyz;
    const AXIS_ORDER: [usize; 3] = [2, 1, 0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zyx_strides() {
        let s = LayoutZyx::strides(Coord::new(30, 13, 17));
        assert_eq!(s, [13 * 17, 17, 1]);
        assert_eq!(LayoutZyx::AXIS_ORDER[0], 0);
    }

    #[test]
    fn xyz_strides() {
        let s = LayoutXyz::strides(Coord::new(30, 13, 17));
        assert_eq!(s, [1, 30, 30 * 13]);
        assert_eq!(LayoutXyz::AXIS_ORDER[0], 2);
    }

    #[test]
    fn visit_order_follows_layout() {
        let bbox = CoordBBox::from_dims(Coord::new(2, 2, 2));
        let mut zyx = Vec::new();
        LayoutZyx::for_each_coord(&bbox, |p| zyx.push(p));
        assert_eq!(&zyx[..3], &[Coord::new(0, 0, 0), Coord::new(0, 0, 1), Coord::new(0, 1, 0)]);

        let mut xyz = Vec::new();
        LayoutXyz::for_each_coord(&bbox, |p| xyz.push(p));
        assert_eq!(&xyz[..3], &[Coord::new(0, 0, 0), Coord::new(1, 0, 0), Coord::new(0, 1, 0)]);
        assert_eq!(xyz.len(), 8);
    }

    #[test]
    fn display() {
        assert_eq!(MemoryLayout::Zyx.to_string(), "zyx");
        assert_eq!(MemoryLayout::Xyz.to_string(), "xyz");
    }
}
