use std::cmp::Reverse;

use crate::tree::{LEAF_DIM, LEAF_LOG2DIM};
use crate::types::{Coord, CoordBBox};

/// Which axis a [`BoxSplitter`] cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SplitAxis {
    /// The longest axis that can be cut, falling back to shorter ones.
    Longest,
    /// Always the same axis.
    Fixed(usize),
}

/// Recursive bisection rule for parallel work over a [`CoordBBox`].
///
/// Cuts are placed on leaf boundaries (multiples of [`LEAF_DIM`]) so no leaf
/// is ever shared by two sub-boxes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoxSplitter {
    pub axis: SplitAxis,
    pub grain: i32,
}

impl BoxSplitter {
    pub fn longest(grain: i32) -> Self {
        Self {
            axis: SplitAxis::Longest,
            grain,
        }
    }

    pub fn fixed(axis: usize, grain: i32) -> Self {
        Self {
            axis: SplitAxis::Fixed(axis),
            grain,
        }
    }

    /// Split `bbox` into two non-empty halves, or `None` when it is already at
    /// grain size or has no leaf boundary to cut along.
    ///
    /// [`SplitAxis::Longest`] tries the axes from longest to shortest and cuts
    /// the first one that is above grain size and crosses a leaf boundary.
    pub fn split(&self, bbox: &CoordBBox) -> Option<(CoordBBox, CoordBBox)> {
        if bbox.is_empty() {
            return None;
        }
        match self.axis {
            SplitAxis::Fixed(axis) => self.split_along(bbox, axis),
            SplitAxis::Longest => axes_by_extent(bbox)
                .into_iter()
                .find_map(|axis| self.split_along(bbox, axis)),
        }
    }

    fn split_along(&self, bbox: &CoordBBox, axis: usize) -> Option<(CoordBBox, CoordBBox)> {
        if extent(bbox, axis) <= i64::from(self.grain) {
            return None;
        }
        split_at_leaf_plane(bbox, axis)
    }

    /// `rayon::iter::split` adapter for plain boxes.
    pub fn split_box(&self, bbox: CoordBBox) -> (CoordBBox, Option<CoordBBox>) {
        match self.split(&bbox) {
            Some((left, right)) => (left, Some(right)),
            None => (bbox, None),
        }
    }
}

/// Voxel count of `bbox` along `axis`, widened so boxes touching both ends of
/// the `i32` range do not overflow.
fn extent(bbox: &CoordBBox, axis: usize) -> i64 {
    i64::from(bbox.max[axis]) - i64::from(bbox.min[axis]) + 1
}

/// Axis indices ordered by decreasing extent; ties keep the lower axis first.
fn axes_by_extent(bbox: &CoordBBox) -> [usize; 3] {
    let mut axes = [0, 1, 2];
    axes.sort_by_key(|&a| Reverse(extent(bbox, a)));
    axes
}

/// Cut `bbox` along `axis` at the leaf boundary closest to its middle.
///
/// Plane arithmetic runs in `i64`: the boundary after a leaf at the top of
/// the `i32` range is not representable as an `i32`.
fn split_at_leaf_plane(bbox: &CoordBBox, axis: usize) -> Option<(CoordBBox, CoordBBox)> {
    let leaf = i64::from(LEAF_DIM);
    let lo = i64::from(bbox.min[axis]);
    let hi = i64::from(bbox.max[axis]);

    // Leaf boundaries strictly inside (lo, hi].
    let first = (lo.div_euclid(leaf) + 1) * leaf;
    let last = hi.div_euclid(leaf) * leaf;
    if first > last {
        return None;
    }

    let mid = lo + (hi - lo + 1) / 2;
    let plane = ((mid + leaf / 2).div_euclid(leaf) * leaf).clamp(first, last);
    let plane = i32::try_from(plane).ok()?;

    let mut left = *bbox;
    let mut right = *bbox;
    left.max[axis] = plane - 1;
    right.min[axis] = plane;
    Some((left, right))
}

/// Leaf-sized tiles covering `bbox`: each leaf origin together with the part
/// of `bbox` that falls inside that leaf, in `(i, j, k)` order.
pub(crate) fn leaf_tiles(bbox: CoordBBox) -> impl Iterator<Item = (Coord, CoordBBox)> {
    let (lo, hi) = if bbox.is_empty() {
        (Coord::splat(0), Coord::splat(-1))
    } else {
        (
            bbox.min.block_origin(LEAF_LOG2DIM),
            bbox.max.block_origin(LEAF_LOG2DIM),
        )
    };
    let step = LEAF_DIM as usize;

    (lo.x()..=hi.x()).step_by(step).flat_map(move |x| {
        (lo.y()..=hi.y()).step_by(step).flat_map(move |y| {
            (lo.z()..=hi.z()).step_by(step).map(move |z| {
                let origin = Coord::new(x, y, z);
                (origin, CoordBBox::create_cube(origin, LEAF_DIM).intersect(&bbox))
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fully bisect `bbox` and return the leaves of the recursion.
    fn split_all(splitter: &BoxSplitter, bbox: CoordBBox) -> Vec<CoordBBox> {
        match splitter.split(&bbox) {
            Some((l, r)) => {
                let mut out = split_all(splitter, l);
                out.extend(split_all(splitter, r));
                out
            }
            None => vec![bbox],
        }
    }

    #[test]
    fn split_planes_are_leaf_aligned() {
        let bbox = CoordBBox::new(Coord::new(-12, 7, -32), Coord::new(12, 14, -15));
        let (l, r) = BoxSplitter::longest(1).split(&bbox).unwrap();
        assert_eq!(r.min[0] % LEAF_DIM, 0);
        assert_eq!(l.max[0] + 1, r.min[0]);
        assert_eq!(l.volume() + r.volume(), bbox.volume());
    }

    #[test]
    fn bisection_partitions_the_box() {
        let bbox = CoordBBox::new(Coord::new(-40, -5, 6), Coord::new(-11, 7, 22));
        let parts = split_all(&BoxSplitter::longest(8), bbox);
        assert!(parts.len() > 1);

        let total: u64 = parts.iter().map(CoordBBox::volume).sum();
        assert_eq!(total, bbox.volume());
        for (n, a) in parts.iter().enumerate() {
            assert!(bbox.is_inside(a));
            for b in &parts[n + 1..] {
                assert!(a.intersect(b).is_empty(), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn no_leaf_is_shared_between_parts() {
        let bbox = CoordBBox::new(Coord::new(-17, -3, 1), Coord::new(30, 25, 9));
        let parts = split_all(&BoxSplitter::longest(1), bbox);
        let mut seen = std::collections::HashSet::new();
        for part in &parts {
            for (origin, _) in leaf_tiles(*part) {
                assert!(seen.insert(origin), "leaf {origin} visited twice");
            }
        }
    }

    #[test]
    fn box_inside_one_leaf_does_not_split() {
        let bbox = CoordBBox::new(Coord::new(1, 1, 1), Coord::new(7, 7, 7));
        assert!(BoxSplitter::longest(1).split(&bbox).is_none());
        let (whole, rest) = BoxSplitter::longest(1).split_box(bbox);
        assert_eq!(whole, bbox);
        assert!(rest.is_none());
    }

    #[test]
    fn grain_stops_recursion() {
        let bbox = CoordBBox::from_dims(Coord::new(64, 8, 8));
        assert!(BoxSplitter::longest(64).split(&bbox).is_none());
        assert_eq!(split_all(&BoxSplitter::longest(16), bbox).len(), 4);
    }

    #[test]
    fn fixed_axis_only_cuts_that_axis() {
        let bbox = CoordBBox::from_dims(Coord::new(4, 64, 32));
        let parts = split_all(&BoxSplitter::fixed(2, 8), bbox);
        assert_eq!(parts.len(), 4);
        for p in &parts {
            assert_eq!(p.dim()[0], 4);
            assert_eq!(p.dim()[1], 64);
            assert_eq!(p.dim()[2], 8);
        }
    }

    #[test]
    fn boxes_at_the_top_of_the_range_split_without_overflow() {
        let top = i32::MAX;
        let bbox = CoordBBox::new(Coord::new(top - 20, 0, 0), Coord::new(top, 1, 1));
        let (l, r) = BoxSplitter::longest(1).split(&bbox).unwrap();
        assert_eq!(l.max[0], top - 8);
        assert_eq!(r.min[0], top - 7);
        assert_eq!(r.max[0], top);

        let parts = split_all(&BoxSplitter::fixed(0, 1), bbox);
        let total: u64 = parts.iter().map(CoordBBox::volume).sum();
        assert_eq!(total, bbox.volume());
        assert!(parts.iter().all(|p| bbox.is_inside(p)));

        // Last leaf of the range: no boundary left to cut along.
        let last_leaf = CoordBBox::new(Coord::new(top - 3, 0, 0), Coord::new(top, 1, 1));
        assert!(BoxSplitter::longest(1).split(&last_leaf).is_none());
        assert!(BoxSplitter::fixed(0, 1).split(&last_leaf).is_none());

        let tiles: Vec<_> = leaf_tiles(last_leaf).collect();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].0, Coord::new(top - 7, 0, 0));
        assert_eq!(tiles[0].1, last_leaf);
    }

    #[test]
    fn boxes_at_the_bottom_of_the_range_split_without_overflow() {
        let bottom = i32::MIN;
        let bbox = CoordBBox::new(Coord::new(bottom, 0, 0), Coord::new(bottom + 20, 1, 1));
        let (l, r) = BoxSplitter::longest(1).split(&bbox).unwrap();
        assert_eq!(l.min[0], bottom);
        assert_eq!(r.min[0], bottom + 8);

        let first_leaf = CoordBBox::new(Coord::new(bottom, 0, 0), Coord::new(bottom + 3, 1, 1));
        assert!(BoxSplitter::longest(1).split(&first_leaf).is_none());
    }

    #[test]
    fn longest_falls_back_to_a_shorter_cuttable_axis() {
        // x is longest but lies inside one leaf; y crosses the plane at 8.
        let bbox = CoordBBox::new(Coord::new(0, 6, 0), Coord::new(7, 10, 0));
        let (l, r) = BoxSplitter::longest(1).split(&bbox).unwrap();
        assert_eq!(l, CoordBBox::new(Coord::new(0, 6, 0), Coord::new(7, 7, 0)));
        assert_eq!(r, CoordBBox::new(Coord::new(0, 8, 0), Coord::new(7, 10, 0)));

        // The fallback still respects the grain.
        assert!(BoxSplitter::longest(5).split(&bbox).is_none());
    }

    #[test]
    fn axes_are_ordered_by_extent() {
        let bbox = CoordBBox::new(Coord::new(-40, -5, 6), Coord::new(-11, 7, 22));
        assert_eq!(axes_by_extent(&bbox), [0, 2, 1]);
        let tall = CoordBBox::new(Coord::ZERO, Coord::new(3, 3, 40));
        assert_eq!(axes_by_extent(&tall), [2, 0, 1]);
        let full = CoordBBox::new(Coord::new(i32::MIN, 0, 0), Coord::new(i32::MAX, 0, 0));
        assert_eq!(extent(&full, 0), 1 << 32);
    }

    #[test]
    fn leaf_tiles_cover_box_once() {
        let bbox = CoordBBox::new(Coord::new(-3, 5, 14), Coord::new(9, 6, 17));
        let tiles: Vec<_> = leaf_tiles(bbox).collect();
        assert_eq!(tiles.len(), 3 * 2);
        let covered: u64 = tiles.iter().map(|(_, t)| t.volume()).sum();
        assert_eq!(covered, bbox.volume());
        assert_eq!(tiles[0].0, Coord::new(-8, 0, 8));
        assert_eq!(tiles[0].1, CoordBBox::new(Coord::new(-3, 5, 14), Coord::new(-1, 6, 15)));
        assert_eq!(leaf_tiles(CoordBBox::EMPTY).count(), 0);
    }
}
