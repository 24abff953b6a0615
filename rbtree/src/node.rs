use core::fmt;

/// Handle to a node stored in a tree's arena.
///
/// Ids are only meaningful for the tree that handed them out, and only until
/// that tree is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Red`].
    ///
    /// [`Red`]: Color::Red
    #[must_use]
    pub fn is_red(&self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` if the color is [`Black`].
    ///
    /// [`Black`]: Color::Black
    #[must_use]
    pub fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }
}

/// Which child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Where a node hangs relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodePos {
    Root,
    Child(Side),
}

pub(crate) struct Node<T> {
    pub(crate) value: T,
    // Plain BST nodes keep the default `Black`, only the balancing layer reads it.
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T, color: Color) -> Self {
        Self {
            value,
            color,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Left.opposite().opposite(), Side::Left);
    }

    #[test]
    fn child_slots() {
        let mut node = Node::new(5, Color::Red);
        assert_eq!(node.child(Side::Left), None);
        *node.child_mut(Side::Right) = Some(NodeId(3));
        assert_eq!(node.right, Some(NodeId(3)));
        assert_eq!(node.child(Side::Right), Some(NodeId(3)));
        assert_eq!(node.left, None);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId(12).to_string(), "#12");
    }
}
