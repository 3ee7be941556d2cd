//! # robot-link-tree
//!
//! An engine-agnostic kinematic tree for articulated robots, built on [`glam`].
//!
//! Each rigid body is a [`Link`] stored in a [`LinkTree`] arena and wired with a
//! compact first-child / next-sister encoding. [`TreeResolver`] derives every
//! link's `mother` from that encoding, which is what forward and inverse
//! kinematics walkers need to traverse the chain parent to child.
//!
//! ```
//! use robot_link_tree::{Link, LinkTree, ROOT, SENTINEL, resolve_mothers};
//!
//! let mut tree = LinkTree::from_links([
//!     Link::new(1, "base").with_child(2),
//!     Link::new(2, "left_leg").with_sister(3),
//!     Link::new(3, "right_leg"),
//! ])?;
//! resolve_mothers(&mut tree)?;
//!
//! assert_eq!(tree.get(ROOT).unwrap().mother, Some(SENTINEL));
//! assert_eq!(tree.get(3).unwrap().mother, Some(1));
//! # Ok::<(), robot_link_tree::TreeError>(())
//! ```

pub mod error;
pub mod link;
pub mod resolver;
pub mod tree;

pub use error::*;
pub use link::*;
pub use resolver::*;
pub use tree::*;
