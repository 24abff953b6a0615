use crate::bst::BinarySearchTree;
use crate::error::{Error, Result};
use crate::node::{NodeId, NodePos, Side};

impl<T> BinarySearchTree<T> {
    /// Rotates `child` into the position of its parent `parent`.
    ///
    /// If `child` is the left child a right rotation is performed, if it is
    /// the right child a left rotation. The in-order sequence of the tree is
    /// unchanged and colors are left alone.
    ///
    /// Fails without touching the tree if either id is not a node of this
    /// tree, or if `child` is not a direct child of `parent`.
    pub fn rotate(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        if self.get(child).is_none() {
            return Err(Error::MissingNode(child));
        }
        let Some(parent_node) = self.get(parent) else {
            return Err(Error::MissingNode(parent));
        };

        let side = if parent_node.left == Some(child) {
            Side::Left
        } else if parent_node.right == Some(child) {
            Side::Right
        } else {
            return Err(Error::NotParentChild { child, parent });
        };

        self.rotate_up(child, parent, side);
        Ok(())
    }

    /// Rotates `child`, the `side` child of `parent`, above `parent`.
    pub(crate) fn rotate_up(&mut self, child: NodeId, parent: NodeId, side: Side) {
        // side == Left (right rotation):
        //
        //            g                    g
        //            |                    |
        //       +-parent-+           +-child-+
        //       |        |    -->    |       |
        //   +-child-+    c           a   +-parent-+
        //   |       |                    |        |
        //   a       b                    b        c
        //
        // side == Right is the mirror image. a, b, c can be any subtrees,
        // b is the "inner" subtree that changes owner.
        debug_assert_eq!(self.child(parent, side), Some(child));
        tracing::trace!(%child, %parent, ?side, "rotate");

        // attach b to parent
        let inner = self.child(child, side.opposite());
        self.set_child(parent, side, inner);
        if let Some(inner) = inner {
            self.set_parent(inner, Some(parent));
        }

        // attach child to g
        let grand_parent = self.node(parent).parent;
        match self.pos(parent) {
            NodePos::Root => self.set_root(child),
            NodePos::Child(parent_side) => {
                if let Some(g) = grand_parent {
                    self.set_child(g, parent_side, Some(child));
                }
            }
        }
        self.set_parent(child, grand_parent);

        // attach parent to child
        self.set_child(child, side.opposite(), Some(parent));
        self.set_parent(parent, Some(child));
    }
}
