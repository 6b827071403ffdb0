use crate::types::{Coord, VoxelValue};

use super::{LeafNode, Tree};

/// Read cursor that remembers the last leaf it visited.
///
/// Spatially coherent lookups (the common case when walking a box) hit the
/// cached leaf and skip the hash lookup. Absent leaves are cached too, so
/// long runs through empty space stay cheap. An accessor is owned by a single
/// worker and never shared.
#[derive(Debug)]
pub struct ValueAccessor<'a, T> {
    tree: &'a Tree<T>,
    cached: Option<(Coord, Option<&'a LeafNode<T>>)>,
}

impl<'a, T: VoxelValue> ValueAccessor<'a, T> {
    pub fn new(tree: &'a Tree<T>) -> Self {
        Self { tree, cached: None }
    }

    pub fn tree(&self) -> &'a Tree<T> {
        self.tree
    }

    /// Leaf at `origin`, refreshing the cache on a miss.
    #[inline]
    pub fn probe_leaf(&mut self, origin: Coord) -> Option<&'a LeafNode<T>> {
        match self.cached {
            Some((cached_origin, leaf)) if cached_origin == origin => leaf,
            _ => {
                let leaf = self.tree.probe_leaf(origin);
                self.cached = Some((origin, leaf));
                leaf
            }
        }
    }

    #[inline]
    pub fn get_value(&mut self, xyz: Coord) -> T {
        let background = self.tree.background();
        self.probe_leaf(LeafNode::<T>::origin_of(xyz))
            .map_or(background, |leaf| leaf.get_value(xyz))
    }

    #[inline]
    pub fn probe_value(&mut self, xyz: Coord) -> (T, bool) {
        let background = self.tree.background();
        self.probe_leaf(LeafNode::<T>::origin_of(xyz))
            .map_or((background, false), |leaf| leaf.probe_value(xyz))
    }

    #[inline]
    pub fn is_value_on(&mut self, xyz: Coord) -> bool {
        self.probe_leaf(LeafNode::<T>::origin_of(xyz))
            .is_some_and(|leaf| leaf.is_value_on(xyz))
    }

    /// Forget the cached leaf.
    pub fn clear(&mut self) {
        self.cached = None;
    }
}
