use core::fmt;
use std::borrow::Borrow;
use std::mem;

use crate::bst::BinarySearchTree;
use crate::iter::{Bounds, Iter};
use crate::node::{Color, NodeId, Side};

/// A red-black tree based sorted multiset.
///
/// Insertion is `O(log n)` in the worst case. Equal values are kept, each
/// new copy is placed in the left subtree of the copies already stored.
pub struct RedBlackTree<T> {
    // INVARIANTS (after every completed insert):
    //  * the root is black
    //  * a red node has no red children
    //  * every path from the root to an empty slot has the same number of
    //    black nodes
    tree: BinarySearchTree<T>,
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RedBlackTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt_as("RedBlackTree", f)
    }
}

impl<T> RedBlackTree<T> {
    pub fn new() -> Self {
        Self {
            tree: BinarySearchTree::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Read-only view of the underlying tree, for walking its structure.
    pub fn shape(&self) -> &BinarySearchTree<T> {
        &self.tree
    }

    pub fn color(&self, id: NodeId) -> Option<Color> {
        self.tree.get(id).map(|node| node.color)
    }

    pub fn find<Q>(&self, value: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(value)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(value)
    }

    pub fn iter(&self) -> Iter<'_, T>
    where
        T: Ord,
    {
        self.tree.iter()
    }

    /// Iterates over the values `v` with `lower <= v <= upper` in ascending
    /// order. `None` leaves that end open.
    pub fn range(&self, lower: Option<T>, upper: Option<T>) -> Iter<'_, T>
    where
        T: Ord,
    {
        self.tree.range(lower, upper)
    }

    pub fn iter_within(&self, bounds: Bounds<T>) -> Iter<'_, T>
    where
        T: Ord,
    {
        self.tree.iter_within(bounds)
    }

    /// Number of black nodes on every path from the root down to an empty
    /// slot.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut x = self.tree.root();
        while let Some(id) = x {
            if self.tree.color(id).is_black() {
                count += 1;
            }
            x = self.tree.left(id);
        }
        count
    }

    // A bare rotation breaks the red-black invariants, so it is not public.
    #[cfg(test)]
    pub(crate) fn rotate(&mut self, child: NodeId, parent: NodeId) -> crate::error::Result<()> {
        self.tree.rotate(child, parent)
    }

    pub fn insert(&mut self, value: T) -> NodeId
    where
        T: Ord,
    {
        let new_node = self.tree.alloc(value, Color::Red);
        match self.tree.root() {
            Some(root) => {
                self.tree.insert_helper(new_node, root);
                self.insert_fixup(new_node);
            }
            None => {
                self.tree.set_root(new_node);
                self.tree.set_color(new_node, Color::Black);
            }
        }
        new_node
    }

    fn insert_fixup(&mut self, new_node: NodeId) {
        let tree = &mut self.tree;
        let mut node = new_node;

        while let Some(mut parent) = tree.parent(node) {
            if tree.color(parent).is_black() {
                break;
            }
            debug_assert!(tree.color(node).is_red());
            // Red parent with a red child is the only violation in the tree.
            // The parent can't be the root as the root is always black.
            let Some(grand_parent) = tree.parent(parent) else {
                unreachable!("red node {parent} has no parent");
            };
            debug_assert!(tree.color(grand_parent).is_black());

            // `side` is where parent hangs below grand_parent, every case
            // below is written for side == Left and mirrored by `side`.
            let side = if tree.left(grand_parent) == Some(parent) {
                Side::Left
            } else {
                Side::Right
            };
            let aunt = tree.child(grand_parent, side.opposite());

            match aunt {
                Some(aunt) if tree.color(aunt).is_red() => {
                    //     +--- gp:b ---+               +--- gp:r ---+
                    //     |            |               |            |
                    //  + p:r +      + a:r +   -->   + p:b +      + a:b +
                    //  |     |      |     |         |     |      |     |
                    // n:r    .      .     .        n:r    .      .     .
                    //
                    // Black height is unchanged below grand_parent, but it may
                    // now be a red child of a red node, so repeat from there.
                    tracing::trace!(%node, %parent, %grand_parent, "recolor");
                    tree.set_color(parent, Color::Black);
                    tree.set_color(aunt, Color::Black);
                    tree.set_color(grand_parent, Color::Red);
                    node = grand_parent;
                }
                _ => {
                    if tree.child(parent, side.opposite()) == Some(node) {
                        //       +-- gp:b --+                 +-- gp:b --+
                        //       |          |                 |          |
                        //  +-- p:r --+    a:b  -->       +- n:r --+    a:b
                        //  |         |                   |        |
                        //  .    +- n:r -+            +- p:r -+    .
                        //       |       |            |       |
                        //       .       .            .       .
                        //
                        // bring node and parent onto the same side, then they
                        // swap roles
                        tree.rotate_up(node, parent, side.opposite());
                        mem::swap(&mut parent, &mut node);
                    }

                    //           +-- gp:b --+            +----- p:b -----+
                    //           |          |            |               |
                    //      +-- p:r --+    a:b  -->   +- n:r -+     +- gp:r -+
                    //      |         |               |       |     |        |
                    //  +- n:r -+     .               .       .     .       a:b
                    //
                    // The subtree is valid again with the same black height,
                    // so the whole tree is.
                    tracing::trace!(%node, %parent, %grand_parent, "rotate and swap colors");
                    let (parent_color, grand_color) = (tree.color(parent), tree.color(grand_parent));
                    tree.set_color(parent, grand_color);
                    tree.set_color(grand_parent, parent_color);
                    tree.rotate_up(parent, grand_parent, side);
                    break;
                }
            }
        }

        if let Some(root) = tree.root() {
            tree.set_color(root, Color::Black);
        }
    }

    /// Panics unless the tree is a valid binary search tree that satisfies
    /// all red-black properties.
    pub fn assert_invariants(&self)
    where
        T: Ord,
    {
        self.tree.assert_invariants();

        let Some(root) = self.tree.root() else {
            return;
        };
        assert!(self.tree.color(root).is_black(), "root must be black");
        self.assert_colors(root);
    }

    // Returns the black height of the subtree at `id`, counting empty slots as
    // black leaves.
    fn assert_colors(&self, id: NodeId) -> usize {
        let color = self.tree.color(id);
        let mut heights = [Side::Left, Side::Right].map(|side| match self.tree.child(id, side) {
            Some(child) => {
                assert!(
                    !(color.is_red() && self.tree.color(child).is_red()),
                    "red node {id} has a red child {child}"
                );
                self.assert_colors(child)
            }
            None => 1,
        });
        assert_eq!(heights[0], heights[1], "black height differs below {id}");
        if color.is_black() {
            heights[0] += 1;
        }
        heights[0]
    }
}

impl<'a, T: Ord> IntoIterator for &'a RedBlackTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord> Extend<T> for RedBlackTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for RedBlackTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
