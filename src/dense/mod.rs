pub mod layout;

use std::marker::PhantomData;

use bytemuck::Pod;

use crate::error::{Result, VoxelError};
use crate::types::{Coord, CoordBBox};

pub use layout::{Layout, LayoutXyz, LayoutZyx, MemoryLayout};

/// A bounded, contiguous 3-D array of values over an inclusive [`CoordBBox`].
///
/// The buffer holds exactly `bbox.volume()` values and every cell is
/// materialized; there is no notion of active or inactive here. The mapping
/// between coordinates and buffer offsets is fixed by the layout type `L`.
///
/// Coordinate and offset accessors without a `try_` prefix do not check that
/// their argument lies inside the grid. A coordinate outside the box maps to
/// an arbitrary offset (or panics on the slice bounds check); callers on hot
/// paths are expected to stay inside `bbox()`.
#[derive(Debug, Clone)]
pub struct Dense<T, L: Layout = LayoutZyx> {
    bbox: CoordBBox,
    strides: [usize; 3],
    data: Vec<T>,
    _layout: PhantomData<L>,
}

impl<T: Copy, L: Layout> Dense<T, L> {
    /// Allocate a grid over `bbox` with every value set to `T::default()`.
    pub fn new(bbox: CoordBBox) -> Result<Self>
    where
        T: Default,
    {
        Self::with_value(bbox, T::default())
    }

    /// Allocate a grid over `bbox` with every value set to `value`.
    pub fn with_value(bbox: CoordBBox, value: T) -> Result<Self> {
        if bbox.is_empty() {
            return Err(VoxelError::InvalidRegion(bbox));
        }
        let len = usize::try_from(bbox.volume()).map_err(|_| {
            VoxelError::Config(format!("{bbox} holds more values than fit in memory"))
        })?;

        Ok(Self {
            bbox,
            strides: L::strides(bbox.dim()),
            data: vec![value; len],
            _layout: PhantomData,
        })
    }

    /// Allocate a grid over `[(0, 0, 0), dim - 1]`.
    pub fn from_dims(dim: Coord) -> Result<Self>
    where
        T: Default,
    {
        Self::new(CoordBBox::from_dims(dim))
    }

    pub fn memory_layout() -> MemoryLayout {
        L::MEMORY_LAYOUT
    }

    pub fn bbox(&self) -> CoordBBox {
        self.bbox
    }

    /// Coordinate of the first buffer element (`bbox().min`).
    pub fn origin(&self) -> Coord {
        self.bbox.min
    }

    /// Number of values in the buffer, equal to `bbox().volume()`.
    pub fn value_count(&self) -> usize {
        self.data.len()
    }

    /// Buffer distance between neighbours along `axis`.
    pub fn stride(&self, axis: usize) -> usize {
        self.strides[axis]
    }

    pub fn x_stride(&self) -> usize {
        self.strides[0]
    }

    pub fn y_stride(&self) -> usize {
        self.strides[1]
    }

    pub fn z_stride(&self) -> usize {
        self.strides[2]
    }

    #[inline]
    fn local_offset(&self, i: usize, j: usize, k: usize) -> usize {
        i * self.strides[0] + j * self.strides[1] + k * self.strides[2]
    }

    /// Buffer offset of the global coordinate `xyz`.
    #[inline]
    pub fn coord_to_offset(&self, xyz: Coord) -> usize {
        let local = xyz - self.bbox.min;
        self.local_offset(local.x() as usize, local.y() as usize, local.z() as usize)
    }

    /// Coordinate relative to `origin()` of the value at `offset`.
    #[inline]
    pub fn offset_to_local_coord(&self, offset: usize) -> Coord {
        let mut rest = offset;
        let mut local = Coord::ZERO;
        for axis in L::AXIS_ORDER {
            let stride = self.strides[axis];
            local[axis] = (rest / stride) as i32;
            rest %= stride;
        }
        local
    }

    /// Global coordinate of the value at `offset`.
    #[inline]
    pub fn offset_to_coord(&self, offset: usize) -> Coord {
        self.offset_to_local_coord(offset) + self.bbox.min
    }

    /// Bounds-checked [`Dense::coord_to_offset`].
    pub fn checked_offset(&self, xyz: Coord) -> Result<usize> {
        if !self.bbox.is_inside_coord(xyz) {
            return Err(VoxelError::OutOfRange {
                coord: xyz,
                bbox: self.bbox,
            });
        }
        Ok(self.coord_to_offset(xyz))
    }

    #[inline]
    pub fn get_value(&self, xyz: Coord) -> T {
        self.data[self.coord_to_offset(xyz)]
    }

    #[inline]
    pub fn get_offset(&self, offset: usize) -> T {
        self.data[offset]
    }

    /// Value at local indices `(i, j, k)` relative to `origin()`.
    #[inline]
    pub fn get_local(&self, i: usize, j: usize, k: usize) -> T {
        self.data[self.local_offset(i, j, k)]
    }

    #[inline]
    pub fn set_value(&mut self, xyz: Coord, value: T) {
        let offset = self.coord_to_offset(xyz);
        self.data[offset] = value;
    }

    #[inline]
    pub fn set_offset(&mut self, offset: usize, value: T) {
        self.data[offset] = value;
    }

    /// Write the value at local indices `(i, j, k)` relative to `origin()`.
    #[inline]
    pub fn set_local(&mut self, i: usize, j: usize, k: usize, value: T) {
        let offset = self.local_offset(i, j, k);
        self.data[offset] = value;
    }

    pub fn try_get_value(&self, xyz: Coord) -> Result<T> {
        Ok(self.data[self.checked_offset(xyz)?])
    }

    pub fn try_get_offset(&self, offset: usize) -> Result<T> {
        self.data
            .get(offset)
            .copied()
            .ok_or(VoxelError::OffsetOutOfRange {
                offset,
                len: self.data.len(),
            })
    }

    pub fn try_set_value(&mut self, xyz: Coord, value: T) -> Result<()> {
        let offset = self.checked_offset(xyz)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Set every value to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// The owned buffer, in layout order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate `(coordinate, value)` pairs in buffer order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(offset, v)| (self.offset_to_coord(offset), *v))
    }
}

impl<T: Pod, L: Layout> Dense<T, L> {
    /// Raw byte view of the buffer for bulk I/O.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.data)
    }
}
