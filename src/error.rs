//! Error types for link tree construction and mother resolution.

use crate::link::LinkId;

/// Errors raised when a link collection does not encode a valid rooted tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Id 0 is reserved for "no link" and cannot be stored.
    #[error("link id 0 is the sentinel and cannot be stored as a link")]
    SentinelLink,

    /// The id exceeds [`MAX_LINK_ID`](crate::MAX_LINK_ID).
    #[error("link id {id} exceeds the maximum of {max}")]
    IdOutOfRange { id: LinkId, max: LinkId },

    /// Two links were inserted under the same id.
    #[error("duplicate link id: {0}")]
    DuplicateLink(LinkId),

    /// The requested root id is not present in the collection.
    #[error("invalid kinematic tree: root link {0} not found")]
    MissingRoot(LinkId),

    /// A `child` or `sister` pointer names an id that is not in the collection.
    #[error("invalid kinematic tree: link {from} references missing link {to}")]
    DanglingReference { from: LinkId, to: LinkId },

    /// A link names itself as its own child or sister.
    #[error("invalid kinematic tree: link {0} references itself")]
    SelfReference(LinkId),

    /// The root has a sister, which would make a second root.
    #[error("invalid kinematic tree: root link {root} has sister {sister}")]
    RootSister { root: LinkId, sister: LinkId },

    /// A stored link cannot be reached from the root.
    #[error("invalid kinematic tree: link {0} is not reachable from the root")]
    Unreachable(LinkId),

    /// A link was reached more than once from the root.
    #[error("invalid kinematic tree: link {0} reached twice (cycle or shared subtree)")]
    Cycle(LinkId),
}
