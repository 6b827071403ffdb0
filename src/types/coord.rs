use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Index, IndexMut, Sub};

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Signed integer voxel coordinate `(i, j, k)`.
///
/// Ordering is lexicographic on `(i, j, k)`, which gives the same sort order
/// as walking a k-fastest buffer. Arithmetic is componentwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coord(pub IVec3);

impl Coord {
    pub const ZERO: Coord = Coord(IVec3::ZERO);

    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Coord(IVec3::new(i, j, k))
    }

    /// Coordinate with all three components equal to `v`.
    pub const fn splat(v: i32) -> Self {
        Coord(IVec3::splat(v))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    pub fn z(&self) -> i32 {
        self.0.z
    }

    pub fn to_array(&self) -> [i32; 3] {
        self.0.to_array()
    }

    /// Componentwise minimum.
    pub fn min_components(&self, other: Coord) -> Coord {
        Coord(self.0.min(other.0))
    }

    /// Componentwise maximum.
    pub fn max_components(&self, other: Coord) -> Coord {
        Coord(self.0.max(other.0))
    }

    /// Add `n` to every component.
    pub fn offset_by(&self, n: i32) -> Coord {
        Coord(self.0 + IVec3::splat(n))
    }

    /// Clear the low `log2` bits of every component, i.e. snap down to the
    /// origin of the enclosing block of edge `1 << log2`.
    pub fn block_origin(&self, log2: u32) -> Coord {
        let mask = !((1i32 << log2) - 1);
        Coord(self.0 & IVec3::splat(mask))
    }
}

impl From<[i32; 3]> for Coord {
    fn from(v: [i32; 3]) -> Self {
        Coord(IVec3::from_array(v))
    }
}

impl From<IVec3> for Coord {
    fn from(v: IVec3) -> Self {
        Coord(v)
    }
}

impl From<Coord> for IVec3 {
    fn from(c: Coord) -> Self {
        c.0
    }
}

impl Index<usize> for Coord {
    type Output = i32;

    fn index(&self, axis: usize) -> &i32 {
        &self.0[axis]
    }
}

impl IndexMut<usize> for Coord {
    fn index_mut(&mut self, axis: usize) -> &mut i32 {
        &mut self.0[axis]
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord(self.0 + rhs.0)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord(self.0 - rhs.0)
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_array().cmp(&other.to_array())
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0.x, self.0.y, self.0.z)
    }
}
