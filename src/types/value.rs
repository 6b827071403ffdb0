use glam::Vec3;

/// Element type storable in a [`Dense`](crate::dense::Dense) grid and a
/// sparse [`Tree`](crate::tree::Tree).
///
/// `is_approx_equal` drives pruning during dense -> sparse copies: a value
/// within `tolerance` of the background (boundary included) is left
/// inactive. Vector types compare componentwise and are only equal when
/// every component is within tolerance. `bool` ignores the tolerance and
/// uses exact equality.
pub trait VoxelValue: Copy + PartialEq + Send + Sync + 'static {
    fn is_approx_equal(&self, other: &Self, tolerance: &Self) -> bool;
}

macro_rules! impl_float_value {
    ($($t:ty),*) => {$(
        impl VoxelValue for $t {
            #[inline]
            fn is_approx_equal(&self, other: &Self, tolerance: &Self) -> bool {
                (self - other).abs() <= *tolerance
            }
        }
    )*};
}

macro_rules! impl_int_value {
    ($($t:ty),*) => {$(
        impl VoxelValue for $t {
            #[inline]
            fn is_approx_equal(&self, other: &Self, tolerance: &Self) -> bool {
                self.abs_diff(*other) <= tolerance.unsigned_abs()
            }
        }
    )*};
}

impl_float_value!(f32, f64);
impl_int_value!(i32, i64);

impl VoxelValue for u8 {
    #[inline]
    fn is_approx_equal(&self, other: &Self, tolerance: &Self) -> bool {
        self.abs_diff(*other) <= *tolerance
    }
}

impl VoxelValue for bool {
    #[inline]
    fn is_approx_equal(&self, other: &Self, _tolerance: &Self) -> bool {
        self == other
    }
}

impl VoxelValue for [f32; 3] {
    #[inline]
    fn is_approx_equal(&self, other: &Self, tolerance: &Self) -> bool {
        (0..3).all(|a| (self[a] - other[a]).abs() <= tolerance[a])
    }
}

impl VoxelValue for Vec3 {
    #[inline]
    fn is_approx_equal(&self, other: &Self, tolerance: &Self) -> bool {
        (*self - *other).abs().cmple(*tolerance).all()
    }
}
