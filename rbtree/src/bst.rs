use core::fmt;
use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::iter::{Bounds, Iter};
use crate::node::{Color, Node, NodeId, NodePos, Side};

/// An unbalanced binary search tree.
///
/// Duplicates are allowed: a value equal to an existing node is routed into
/// that node's left subtree, so in-order traversal yields every inserted value
/// with its full multiplicity.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. Child links
/// own their target, the parent link is only a back-reference.
pub struct BinarySearchTree<T> {
    // INVARIANTS:
    //  * every id stored in `root` or in a node link indexes into `nodes`
    //  * `root` is `None` iff `nodes` is empty
    //  * `n.parent == Some(p)` iff `p.left == Some(n)` or `p.right == Some(n)`
    nodes: Vec<Node<T>>,
    root: Option<NodeId>,
}

impl<T> Default for BinarySearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BinarySearchTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node. Ids handed out before are no longer valid.
    pub fn clear(&mut self) {
        tracing::debug!(len = self.len(), "clearing tree");
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.get(id).map(|node| &node.value)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.left)
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.right)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    /// Panics if `id` is not a live node, callers inside the crate only pass
    /// ids read from links.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.node(id).child(side)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        *self.node_mut(id).child_mut(side) = child;
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.node_mut(id).parent = parent;
    }

    #[inline]
    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    pub(crate) fn pos(&self, id: NodeId) -> NodePos {
        match self.node(id).parent {
            None => NodePos::Root,
            Some(parent) => {
                let parent = self.node(parent);
                if parent.left == Some(id) {
                    NodePos::Child(Side::Left)
                } else {
                    assert_eq!(parent.right, Some(id), "parent link of {id} is not symmetric");
                    NodePos::Child(Side::Right)
                }
            }
        }
    }

    /// Allocates a detached node.
    pub(crate) fn alloc(&mut self, value: T, color: Color) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(value, color));
        id
    }

    /// Inserts `value` without any rebalancing and returns the new node.
    pub fn insert(&mut self, value: T) -> NodeId
    where
        T: Ord,
    {
        let new_node = self.alloc(value, Color::Black);
        match self.root {
            Some(root) => self.insert_helper(new_node, root),
            None => self.root = Some(new_node),
        }
        new_node
    }

    /// Links the detached `new_node` below `subtree` by ordinary comparison
    /// descent. Values equal to a visited node go left.
    pub(crate) fn insert_helper(&mut self, new_node: NodeId, subtree: NodeId)
    where
        T: Ord,
    {
        debug_assert!(self.node(new_node).parent.is_none());

        let mut x = subtree;
        loop {
            let side = if self.node(new_node).value <= self.node(x).value {
                Side::Left
            } else {
                Side::Right
            };
            match self.child(x, side) {
                Some(child) => x = child,
                None => {
                    self.set_child(x, side, Some(new_node));
                    self.set_parent(new_node, Some(x));
                    return;
                }
            }
        }
    }

    /// Returns a node holding a value equal to `value`, if any.
    pub fn find<Q>(&self, value: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut x = self.root;
        while let Some(id) = x {
            x = match value.cmp(self.node(id).value.borrow()) {
                Ordering::Less => self.node(id).left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => self.node(id).right,
            };
        }

        None
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(value).is_some()
    }

    /// Iterates over all values in ascending order.
    pub fn iter(&self) -> Iter<'_, T>
    where
        T: Ord,
    {
        Iter::new(self, Bounds::unbounded())
    }

    /// Iterates over the values `v` with `lower <= v <= upper` in ascending
    /// order. `None` leaves that end open.
    pub fn range(&self, lower: Option<T>, upper: Option<T>) -> Iter<'_, T>
    where
        T: Ord,
    {
        Iter::new(self, Bounds::new(lower, upper))
    }

    pub fn iter_within(&self, bounds: Bounds<T>) -> Iter<'_, T>
    where
        T: Ord,
    {
        Iter::new(self, bounds)
    }

    /// Calls `f` on every node of the subtree at `id` in order. Uses an
    /// explicit stack, an unbalanced tree can be as deep as it is long.
    pub(crate) fn inorder_for_each_core<F>(&self, id: NodeId, f: &mut F)
    where
        F: FnMut(NodeId),
    {
        let mut stack = Vec::new();
        let mut x = Some(id);
        loop {
            while let Some(id) = x {
                stack.push(id);
                x = self.node(id).left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            f(id);
            x = self.node(id).right;
        }
    }

    /// Panics unless every link is symmetric, the order invariant holds
    /// (left subtree `<=` node `<=` right subtree) and every node is
    /// reachable from the root.
    ///
    /// Equal values are inserted to the left, but a rotation can lift an
    /// equal left child above its parent, which then sits to its right.
    pub fn assert_invariants(&self)
    where
        T: Ord,
    {
        let Some(root) = self.root else {
            assert!(self.nodes.is_empty(), "tree without root must not own nodes");
            return;
        };

        assert_eq!(self.node(root).parent, None, "root must not have a parent");

        // (node, closest right-side ancestor, closest left-side ancestor)
        let mut stack: Vec<(NodeId, Option<&T>, Option<&T>)> = vec![(root, None, None)];
        let mut reachable = 0;
        while let Some((id, lower, upper)) = stack.pop() {
            reachable += 1;
            assert!(reachable <= self.len(), "links must not form a cycle");

            let node = self.node(id);
            if let Some(lower) = lower {
                assert!(node.value >= *lower, "{id} must not be less than its right-side ancestors");
            }
            if let Some(upper) = upper {
                assert!(node.value <= *upper, "{id} must not exceed its left-side ancestors");
            }

            if let Some(left) = node.left {
                assert_eq!(self.node(left).parent, Some(id), "parent link of {left} must point to {id}");
                stack.push((left, lower, Some(&node.value)));
            }
            if let Some(right) = node.right {
                assert_eq!(self.node(right).parent, Some(id), "parent link of {right} must point to {id}");
                stack.push((right, Some(&node.value), upper));
            }
        }
        assert_eq!(reachable, self.len(), "every node must be reachable from the root");
    }

    pub(crate) fn debug_node(&self, id: NodeId) -> NodeDebug<'_, T> {
        NodeDebug { tree: self, id }
    }

    pub(crate) fn fmt_as(&self, name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        T: fmt::Debug,
    {
        struct NodesDebug<'a, T> {
            tree: &'a BinarySearchTree<T>,
            root: NodeId,
        }

        impl<T: fmt::Debug> fmt::Debug for NodesDebug<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut f = f.debug_list();
                self.tree.inorder_for_each_core(self.root, &mut |id| {
                    f.entry(&self.tree.debug_node(id));
                });
                f.finish()
            }
        }

        let mut f = f.debug_struct(name);
        f.field("len", &self.len());

        match self.root {
            None => {
                f.field("root", &None::<T>);
                let nodes: &[T] = &[];
                f.field("nodes", &nodes);
            }
            Some(root) => {
                f.field("root", &Some(self.debug_node(root)));
                f.field("nodes", &NodesDebug { tree: self, root });
            }
        }

        f.finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for BinarySearchTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_as("BinarySearchTree", f)
    }
}

impl<'a, T: Ord> IntoIterator for &'a BinarySearchTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub(crate) struct NodeDebug<'a, T> {
    tree: &'a BinarySearchTree<T>,
    id: NodeId,
}

impl<T: fmt::Debug> fmt::Debug for NodeDebug<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.tree.node(self.id);
        let mut f = f.debug_struct("Node");
        f.field("id", &self.id)
            .field("value", &node.value)
            .field("color", &node.color);

        let mut dbg_link = |name: &str, link: Option<NodeId>| {
            f.field(name, &link.map(|id| &self.tree.node(id).value));
        };
        dbg_link("parent", node.parent);
        dbg_link("left", node.left);
        dbg_link("right", node.right);

        f.finish()
    }
}

/// Expected shape of a subtree, compared against [`BinarySearchTree::snapshot`].
#[cfg(test)]
#[derive(Debug, PartialEq)]
pub(crate) struct TestNode<T> {
    pub(crate) value: T,
    pub(crate) parent: Option<T>,
    pub(crate) left: Option<Box<TestNode<T>>>,
    pub(crate) right: Option<Box<TestNode<T>>>,
}

#[cfg(test)]
impl<T> TestNode<T> {
    pub(crate) fn leaf(value: T, parent: T) -> Self {
        Self {
            value,
            parent: Some(parent),
            left: None,
            right: None,
        }
    }

    pub(crate) fn with(
        value: T,
        parent: Option<T>,
        left: Option<TestNode<T>>,
        right: Option<TestNode<T>>,
    ) -> Self {
        Self {
            value,
            parent,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }
}

#[cfg(test)]
impl<T: Clone> BinarySearchTree<T> {
    pub(crate) fn snapshot(&self) -> Option<TestNode<T>> {
        fn inner<T: Clone>(tree: &BinarySearchTree<T>, id: NodeId) -> TestNode<T> {
            let node = tree.node(id);
            TestNode {
                value: node.value.clone(),
                parent: node.parent.map(|p| tree.node(p).value.clone()),
                left: node.left.map(|l| Box::new(inner(tree, l))),
                right: node.right.map(|r| Box::new(inner(tree, r))),
            }
        }

        self.root.map(|root| inner(self, root))
    }

    pub(crate) fn inorder(&self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.len());
        if let Some(root) = self.root {
            self.inorder_for_each_core(root, &mut |id| items.push(self.node(id).value.clone()));
        }
        items
    }
}
