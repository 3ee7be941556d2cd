use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Index of a link inside a [`LinkTree`](crate::LinkTree).
pub type LinkId = usize;

/// Reserved id meaning "no link". Never addressable.
pub const SENTINEL: LinkId = 0;

/// Id of the designated root link.
pub const ROOT: LinkId = 1;

/// Largest id a [`LinkTree`](crate::LinkTree) accepts. The arena is indexed by
/// id, so this bounds its allocation.
pub const MAX_LINK_ID: LinkId = 1 << 20;

/// One rigid body / joint frame in the kinematic chain.
///
/// Links are wired with a compact first-child / next-sister encoding: each link
/// only knows its first `child` and its next `sister`. The `mother` pointer is
/// derived from those by [`TreeResolver`](crate::TreeResolver).
///
/// The kinematic fields are `None` until a loader or a kinematics walker fills
/// them in, so "not yet computed" stays distinct from "computed as zero".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Unique index into the link collection. Never [`SENTINEL`].
    pub id: LinkId,

    /// Display label. Not required to be unique.
    pub name: String,

    /// Next sibling under the same mother, or [`SENTINEL`] for the last sibling.
    pub sister: LinkId,

    /// First child, or [`SENTINEL`] for a leaf.
    pub child: LinkId,

    /// Parent link.
    /// `None` until resolved; `Some(SENTINEL)` for the root after resolution.
    pub mother: Option<LinkId>,

    /// Joint axis `a`, relative to the mother's frame.
    pub axis: Option<Vec3>,

    /// Joint offset `b`, relative to the mother's frame.
    pub offset: Option<Vec3>,

    /// World-frame position `p`.
    pub position: Option<Vec3>,

    /// Joint coordinate `q` (radians for revolute joints, meters for prismatic).
    pub angle: Option<f32>,

    /// World-frame attitude `R`.
    pub attitude: Option<Mat3>,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            id: SENTINEL,
            name: "Untitled".to_string(),
            sister: SENTINEL,
            child: SENTINEL,
            mother: None,
            axis: None,
            offset: None,
            position: None,
            angle: None,
            attitude: None,
        }
    }
}

impl Link {
    /// Creates an unwired link with no child, no sister and an unresolved mother.
    pub fn new(id: LinkId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the first child (builder pattern).
    pub fn with_child(mut self, child: LinkId) -> Self {
        self.child = child;
        self
    }

    /// Sets the next sister (builder pattern).
    pub fn with_sister(mut self, sister: LinkId) -> Self {
        self.sister = sister;
        self
    }

    /// Sets the joint axis `a`.
    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Sets the joint offset `b`.
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether `child` names a link rather than the sentinel.
    pub fn has_child(&self) -> bool {
        self.child != SENTINEL
    }

    /// Whether `sister` names a link rather than the sentinel.
    pub fn has_sister(&self) -> bool {
        self.sister != SENTINEL
    }

    /// Whether the mother pointer has been filled in.
    pub fn is_resolved(&self) -> bool {
        self.mother.is_some()
    }

    /// Whether this link has been resolved as a tree root (mother is the sentinel).
    pub fn is_root(&self) -> bool {
        self.mother == Some(SENTINEL)
    }
}
