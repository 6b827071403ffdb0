pub mod accessor;
pub mod leaf;

use std::collections::HashMap;

use crate::types::{Coord, CoordBBox, VoxelValue};

pub use accessor::ValueAccessor;
pub use leaf::{LEAF_DIM, LEAF_LOG2DIM, LEAF_SIZE, LeafNode};

/// Sparse voxel tree over the unbounded integer lattice.
///
/// Every coordinate implicitly holds `background` until a leaf block is
/// allocated for it. Storage is a hash map of fixed-size [`LeafNode`]s keyed
/// by leaf origin, so the unit of concurrent-write safety is one leaf.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    background: T,
    leaves: HashMap<Coord, LeafNode<T>>,
}

impl<T: VoxelValue> Tree<T> {
    /// Empty tree: every voxel is inactive and equal to `background`.
    pub fn new(background: T) -> Self {
        Self {
            background,
            leaves: HashMap::new(),
        }
    }

    pub fn background(&self) -> T {
        self.background
    }

    pub fn get_value(&self, xyz: Coord) -> T {
        self.probe_leaf(LeafNode::<T>::origin_of(xyz))
            .map_or(self.background, |leaf| leaf.get_value(xyz))
    }

    /// Value and active state of `xyz`.
    pub fn probe_value(&self, xyz: Coord) -> (T, bool) {
        self.probe_leaf(LeafNode::<T>::origin_of(xyz))
            .map_or((self.background, false), |leaf| leaf.probe_value(xyz))
    }

    pub fn is_value_on(&self, xyz: Coord) -> bool {
        self.probe_leaf(LeafNode::<T>::origin_of(xyz))
            .is_some_and(|leaf| leaf.is_value_on(xyz))
    }

    fn touch_leaf(&mut self, xyz: Coord) -> &mut LeafNode<T> {
        let background = self.background;
        self.leaves
            .entry(LeafNode::<T>::origin_of(xyz))
            .or_insert_with(|| LeafNode::new(xyz, background))
    }

    /// Write `value` at `xyz` and mark it active.
    pub fn set_value(&mut self, xyz: Coord, value: T) {
        self.touch_leaf(xyz).set_value_on(xyz, value);
    }

    /// Write `value` at `xyz` and mark it inactive.
    pub fn set_value_off(&mut self, xyz: Coord, value: T) {
        if value == self.background && !self.leaves.contains_key(&LeafNode::<T>::origin_of(xyz)) {
            return;
        }
        self.touch_leaf(xyz).set_value_off(xyz, value);
    }

    /// Change the active state of `xyz` without touching its value.
    pub fn set_active_state(&mut self, xyz: Coord, on: bool) {
        let allocated = self.leaves.contains_key(&LeafNode::<T>::origin_of(xyz));
        if allocated || on {
            self.touch_leaf(xyz).set_active_state(xyz, on);
        }
    }

    /// Total number of active voxels.
    pub fn active_voxel_count(&self) -> u64 {
        self.leaves.values().map(LeafNode::on_count).sum()
    }

    /// Tight bounding box of all active voxels; empty if there are none.
    pub fn eval_active_voxel_bbox(&self) -> CoordBBox {
        self.leaves
            .values()
            .fold(CoordBBox::EMPTY, |bb, leaf| bb.union(&leaf.eval_active_bbox()))
    }

    /// Whether both trees have exactly the same active voxels. Values,
    /// backgrounds, and inactive leaves are not compared.
    pub fn has_same_topology(&self, other: &Tree<T>) -> bool {
        let covered = |a: &Tree<T>, b: &Tree<T>| {
            a.leaves.iter().all(|(origin, leaf)| match b.leaves.get(origin) {
                Some(other_leaf) => leaf.has_same_topology(other_leaf),
                None => leaf.is_empty(),
            })
        };
        covered(self, other) && covered(other, self)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Leaf whose origin is `origin`, if allocated.
    pub fn probe_leaf(&self, origin: Coord) -> Option<&LeafNode<T>> {
        self.leaves.get(&origin)
    }

    /// Insert `leaf`, replacing and returning any leaf at the same origin.
    pub fn add_leaf(&mut self, leaf: LeafNode<T>) -> Option<LeafNode<T>> {
        self.leaves.insert(leaf.origin(), leaf)
    }

    pub fn remove_leaf(&mut self, origin: Coord) -> Option<LeafNode<T>> {
        self.leaves.remove(&origin)
    }

    /// Iterate `(coordinate, value)` over every active voxel, in no
    /// particular order.
    pub fn iter_on(&self) -> impl Iterator<Item = (Coord, T)> + '_ {
        self.leaves.values().flat_map(|leaf| leaf.iter_on())
    }

    /// Drop leaves with no active voxels whose values all equal the
    /// background. Returns the number of leaves removed.
    pub fn prune(&mut self) -> usize {
        let before = self.leaves.len();
        let background = self.background;
        self.leaves
            .retain(|_, leaf| !leaf.is_inactive_background(background));
        before - self.leaves.len()
    }

    /// Cached read cursor into this tree.
    pub fn accessor(&self) -> ValueAccessor<'_, T> {
        ValueAccessor::new(self)
    }
}
