use crate::types::{Coord, CoordBBox, VoxelValue};

/// log2 of the leaf edge length.
pub const LEAF_LOG2DIM: u32 = 3;
/// Voxels per leaf edge.
pub const LEAF_DIM: i32 = 1 << LEAF_LOG2DIM;
/// Voxels per leaf.
pub const LEAF_SIZE: usize = 1 << (3 * LEAF_LOG2DIM);

const MASK_WORDS: usize = LEAF_SIZE / 64;

/// An `8 x 8 x 8` block of voxels with a per-voxel active bit.
///
/// Inactive voxels still carry a value (usually the tree background).
/// Local offsets are `k`-fastest: `(x << 6) | (y << 3) | z`.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode<T> {
    origin: Coord,
    values: Box<[T]>,
    value_mask: [u64; MASK_WORDS],
}

impl<T: VoxelValue> LeafNode<T> {
    /// New leaf containing `xyz`, all voxels inactive and set to `fill`.
    pub fn new(xyz: Coord, fill: T) -> Self {
        Self {
            origin: Self::origin_of(xyz),
            values: vec![fill; LEAF_SIZE].into_boxed_slice(),
            value_mask: [0; MASK_WORDS],
        }
    }

    /// Origin of the leaf that contains `xyz`.
    #[inline]
    pub fn origin_of(xyz: Coord) -> Coord {
        xyz.block_origin(LEAF_LOG2DIM)
    }

    #[inline]
    pub fn coord_to_offset(xyz: Coord) -> usize {
        let m = (LEAF_DIM - 1) as usize;
        (((xyz.x() as usize) & m) << (2 * LEAF_LOG2DIM))
            | (((xyz.y() as usize) & m) << LEAF_LOG2DIM)
            | ((xyz.z() as usize) & m)
    }

    #[inline]
    pub fn offset_to_global_coord(&self, offset: usize) -> Coord {
        let m = (LEAF_DIM - 1) as usize;
        let local = Coord::new(
            (offset >> (2 * LEAF_LOG2DIM)) as i32,
            ((offset >> LEAF_LOG2DIM) & m) as i32,
            (offset & m) as i32,
        );
        self.origin + local
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Voxel extent of this leaf.
    pub fn bbox(&self) -> CoordBBox {
        CoordBBox::create_cube(self.origin, LEAF_DIM)
    }

    #[inline]
    pub fn get_value(&self, xyz: Coord) -> T {
        self.values[Self::coord_to_offset(xyz)]
    }

    /// Value and active state in one lookup.
    #[inline]
    pub fn probe_value(&self, xyz: Coord) -> (T, bool) {
        let n = Self::coord_to_offset(xyz);
        (self.values[n], self.is_on(n))
    }

    #[inline]
    pub fn is_value_on(&self, xyz: Coord) -> bool {
        self.is_on(Self::coord_to_offset(xyz))
    }

    #[inline]
    fn is_on(&self, n: usize) -> bool {
        self.value_mask[n >> 6] & (1u64 << (n & 63)) != 0
    }

    #[inline]
    fn set_on(&mut self, n: usize, on: bool) {
        if on {
            self.value_mask[n >> 6] |= 1u64 << (n & 63);
        } else {
            self.value_mask[n >> 6] &= !(1u64 << (n & 63));
        }
    }

    /// Write `value` and mark the voxel active.
    #[inline]
    pub fn set_value_on(&mut self, xyz: Coord, value: T) {
        let n = Self::coord_to_offset(xyz);
        self.values[n] = value;
        self.set_on(n, true);
    }

    /// Write `value` and mark the voxel inactive.
    #[inline]
    pub fn set_value_off(&mut self, xyz: Coord, value: T) {
        let n = Self::coord_to_offset(xyz);
        self.values[n] = value;
        self.set_on(n, false);
    }

    #[inline]
    pub fn set_active_state(&mut self, xyz: Coord, on: bool) {
        self.set_on(Self::coord_to_offset(xyz), on);
    }

    /// Number of active voxels.
    pub fn on_count(&self) -> u64 {
        self.value_mask.iter().map(|w| w.count_ones() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.value_mask.iter().all(|&w| w == 0)
    }

    /// No active voxels and every value equals `background`: the leaf holds
    /// nothing the tree background does not already express.
    pub fn is_inactive_background(&self, background: T) -> bool {
        self.is_empty() && self.values.iter().all(|v| *v == background)
    }

    /// Whether both leaves have the same active voxels.
    pub fn has_same_topology(&self, other: &LeafNode<T>) -> bool {
        self.origin == other.origin && self.value_mask == other.value_mask
    }

    /// Iterate `(coordinate, value)` over active voxels.
    pub fn iter_on(&self) -> impl Iterator<Item = (Coord, T)> + '_ {
        (0..LEAF_SIZE)
            .filter(|&n| self.is_on(n))
            .map(|n| (self.offset_to_global_coord(n), self.values[n]))
    }

    /// Bounding box of the active voxels (empty when none are active).
    pub fn eval_active_bbox(&self) -> CoordBBox {
        self.iter_on()
            .fold(CoordBBox::EMPTY, |bb, (xyz, _)| bb.expand_to_include(xyz))
    }
}
