use std::fmt;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use super::Coord;

/// Axis-aligned integer box; both `min` and `max` are inclusive.
///
/// A box with `min[a] > max[a]` on any axis is empty. Boxes are plain
/// values: the growing and clipping operations below all return new boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordBBox {
    pub min: Coord,
    pub max: Coord,
}

impl CoordBBox {
    /// The canonical empty box. Neutral element of [`CoordBBox::union`] and
    /// [`CoordBBox::expand_to_include`].
    pub const EMPTY: CoordBBox = CoordBBox {
        min: Coord::splat(i32::MAX),
        max: Coord::splat(i32::MIN),
    };

    pub fn new(min: Coord, max: Coord) -> Self {
        Self { min, max }
    }

    /// Cube with its minimum corner at `min` and `dim` voxels per side.
    pub fn create_cube(min: Coord, dim: i32) -> Self {
        Self {
            min,
            max: min.offset_by(dim - 1),
        }
    }

    /// Box spanning `[(0, 0, 0), dim - 1]`.
    pub fn from_dims(dim: Coord) -> Self {
        Self {
            min: Coord::ZERO,
            max: dim - Coord::splat(1),
        }
    }

    /// Whether `min` exceeds `max` on any axis.
    pub fn is_empty(&self) -> bool {
        (0..3).any(|a| self.min[a] > self.max[a])
    }

    /// Number of voxels per axis (`max - min + 1`).
    pub fn dim(&self) -> Coord {
        if self.is_empty() {
            return Coord::ZERO;
        }
        self.max - self.min + Coord::splat(1)
    }

    /// Total voxel count; 0 for an empty box.
    pub fn volume(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        (0..3)
            .map(|a| (self.max[a] as i64 - self.min[a] as i64 + 1) as u64)
            .product()
    }

    /// Whether `xyz` lies within the box (boundary included).
    pub fn is_inside_coord(&self, xyz: Coord) -> bool {
        (0..3).all(|a| self.min[a] <= xyz[a] && xyz[a] <= self.max[a])
    }

    /// Whether every voxel of `other` lies within `self`.
    pub fn is_inside(&self, other: &CoordBBox) -> bool {
        (0..3).all(|a| self.min[a] <= other.min[a] && other.max[a] <= self.max[a])
    }

    /// New box grown by `n` voxels on every side.
    pub fn expand_by(&self, n: i32) -> CoordBBox {
        CoordBBox {
            min: self.min.offset_by(-n),
            max: self.max.offset_by(n),
        }
    }

    /// Smallest box containing both `self` and the voxel `xyz`.
    pub fn expand_to_include(&self, xyz: Coord) -> CoordBBox {
        CoordBBox {
            min: self.min.min_components(xyz),
            max: self.max.max_components(xyz),
        }
    }

    /// Smallest box containing both boxes. Empty inputs are ignored.
    pub fn union(&self, other: &CoordBBox) -> CoordBBox {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        CoordBBox {
            min: self.min.min_components(other.min),
            max: self.max.max_components(other.max),
        }
    }

    /// Overlap of the two boxes; empty when they are disjoint.
    pub fn intersect(&self, other: &CoordBBox) -> CoordBBox {
        CoordBBox {
            min: self.min.max_components(other.min),
            max: self.max.min_components(other.max),
        }
    }

    /// Iterate every voxel of the box, k fastest.
    pub fn iter(&self) -> CoordIter {
        CoordIter {
            bbox: *self,
            next: (!self.is_empty()).then_some(self.min),
        }
    }
}

impl Default for CoordBBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for CoordBBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.min, self.max)
    }
}

impl IntoIterator for CoordBBox {
    type Item = Coord;
    type IntoIter = CoordIter;

    fn into_iter(self) -> CoordIter {
        self.iter()
    }
}

/// Iterator over the voxels of a [`CoordBBox`] in `(i, j, k)` lexicographic order.
#[derive(Debug, Clone)]
pub struct CoordIter {
    bbox: CoordBBox,
    next: Option<Coord>,
}

impl Iterator for CoordIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let current = self.next?;
        let mut p = current;
        let (min, max) = (self.bbox.min, self.bbox.max);

        self.next = if p[2] < max[2] {
            p[2] += 1;
            Some(p)
        } else if p[1] < max[1] {
            p[2] = min[2];
            p[1] += 1;
            Some(p)
        } else if p[0] < max[0] {
            p[2] = min[2];
            p[1] = min[1];
            p[0] += 1;
            Some(p)
        } else {
            None
        };

        Some(current)
    }
}

impl FusedIterator for CoordIter {}
