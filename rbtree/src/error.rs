use thiserror::Error;

use crate::node::NodeId;

/// Errors reported to callers of the tree and its iterators.
///
/// Broken internal invariants are not represented here, they panic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The id does not name a live node of this tree.
    #[error("node {0} does not belong to this tree")]
    MissingNode(NodeId),

    /// `rotate` was given two nodes that are not a direct parent/child pair.
    #[error("node {child} is not a child of node {parent}")]
    NotParentChild { child: NodeId, parent: NodeId },

    /// The iterator has no further values inside its bounds.
    #[error("iterator has no more values in range")]
    Exhausted,
}

pub type Result<T> = std::result::Result<T, Error>;
