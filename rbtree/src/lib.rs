#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! A red-black tree sorted multiset with bounded, lazily advancing in-order
//! iteration.
//!
//! [`BinarySearchTree`] holds the node arena and the plain, unbalanced tree
//! operations together with the rotation primitive. [`RedBlackTree`] is built
//! on top of it and keeps the tree balanced on every insert. Both are
//! traversed with [`Iter`], optionally restricted to a [`Bounds`] window.
//!
//! ```
//! use rbtree::RedBlackTree;
//!
//! let tree: RedBlackTree<i32> = [10, 7, 17, 11, 14, 18].into_iter().collect();
//! let window: Vec<_> = tree.range(Some(10), Some(17)).copied().collect();
//! assert_eq!(window, [10, 11, 14, 17]);
//! ```

pub mod bst;
pub mod error;
pub mod iter;
pub mod node;
pub mod red_black_tree;
mod rotation;

pub use bst::BinarySearchTree;
pub use error::{Error, Result};
pub use iter::{Bounds, Iter};
pub use node::{Color, NodeId, Side};
pub use red_black_tree::RedBlackTree;
