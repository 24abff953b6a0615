use std::iter::FusedIterator;

use crate::bst::BinarySearchTree;
use crate::error::{Error, Result};
use crate::node::NodeId;

/// Inclusive window of values an iterator yields. An unset end is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds<T> {
    pub lower: Option<T>,
    pub upper: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> Bounds<T> {
    pub fn new(lower: Option<T>, upper: Option<T>) -> Self {
        Self { lower, upper }
    }

    pub fn unbounded() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    #[must_use]
    pub fn min(mut self, lower: T) -> Self {
        self.lower = Some(lower);
        self
    }

    #[must_use]
    pub fn max(mut self, upper: T) -> Self {
        self.upper = Some(upper);
        self
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: Ord,
    {
        !self.is_below(value) && !self.is_above(value)
    }

    #[inline]
    fn is_below(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.lower.as_ref().is_some_and(|lower| lower > value)
    }

    #[inline]
    fn is_above(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.upper.as_ref().is_some_and(|upper| upper < value)
    }
}

/// Lazy in-order iterator over the values of a tree that fall inside a
/// [`Bounds`] window.
///
/// The iterator borrows the tree, so the tree cannot be modified while it is
/// alive.
pub struct Iter<'a, T> {
    tree: &'a BinarySearchTree<T>,
    // Ancestors still to visit, the next candidate on top.
    stack: Vec<NodeId>,
    bounds: Bounds<T>,
}

impl<'a, T: Ord> Iter<'a, T> {
    pub(crate) fn new(tree: &'a BinarySearchTree<T>, bounds: Bounds<T>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
            bounds,
        };
        iter.push_spine(tree.root());
        iter
    }

    /// Pushes the in-order spine of `node`, skipping every node (and its left
    /// subtree) that lies below the lower bound.
    fn push_spine(&mut self, mut node: Option<NodeId>) {
        while let Some(id) = node {
            let n = self.tree.node(id);
            if self.bounds.is_below(&n.value) {
                node = n.right;
            } else {
                self.stack.push(id);
                node = n.left;
            }
        }
    }

    pub fn bounds(&self) -> &Bounds<T> {
        &self.bounds
    }

    /// Returns `true` if another value inside the bounds remains.
    ///
    /// Once the top of the stack is above the upper bound everything beneath
    /// it is too, so the rest of the stack is never drained.
    pub fn has_next(&self) -> bool {
        match self.stack.last() {
            Some(&top) => !self.bounds.is_above(&self.tree.node(top).value),
            None => false,
        }
    }

    /// Advances the iterator, failing with [`Error::Exhausted`] when
    /// [`has_next`](Self::has_next) is `false`. A failed call leaves the
    /// iterator unchanged.
    pub fn try_next(&mut self) -> Result<&'a T> {
        if !self.has_next() {
            return Err(Error::Exhausted);
        }

        let Some(id) = self.stack.pop() else {
            unreachable!("has_next implies a non-empty stack");
        };
        let tree = self.tree;
        let node = tree.node(id);
        debug_assert!(
            self.bounds.contains(&node.value),
            "{id} popped outside of the iterator bounds"
        );
        self.push_spine(node.right);
        Ok(&node.value)
    }
}

impl<'a, T: Ord> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.has_next() {
            (1, Some(self.tree.len()))
        } else {
            (0, Some(0))
        }
    }
}

impl<T: Ord> FusedIterator for Iter<'_, T> {}
