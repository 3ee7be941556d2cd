//! Arena of [`Link`]s indexed by [`LinkId`].
//!
//! The collection is what an external loader produces and what
//! [`TreeResolver`](crate::TreeResolver) completes. Slot 0 is never occupied,
//! so the [`SENTINEL`] can be looked up safely and always yields `None`.

use crate::error::TreeError;
use crate::link::{Link, LinkId, MAX_LINK_ID, SENTINEL};
use serde::{Deserialize, Serialize};

/// An indexed collection of links wired with first-child / next-sister pointers.
///
/// Serializes as the list of stored links; deserializing goes through
/// [`LinkTree::from_links`] so the same checks as [`LinkTree::insert`] apply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Link>", into = "Vec<Link>")]
pub struct LinkTree {
    /// Links stored at the index equal to their id.
    links: Vec<Option<Link>>,
}

impl LinkTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from already-wired links.
    pub fn from_links(links: impl IntoIterator<Item = Link>) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for link in links {
            tree.insert(link)?;
        }
        Ok(tree)
    }

    /// Stores `link` under its own id.
    ///
    /// The sentinel id, ids above [`MAX_LINK_ID`] and ids that are already
    /// taken are rejected.
    pub fn insert(&mut self, link: Link) -> Result<(), TreeError> {
        let id = link.id;
        if id == SENTINEL {
            return Err(TreeError::SentinelLink);
        }
        if id > MAX_LINK_ID {
            return Err(TreeError::IdOutOfRange {
                id,
                max: MAX_LINK_ID,
            });
        }
        if self.contains(id) {
            return Err(TreeError::DuplicateLink(id));
        }
        if id >= self.links.len() {
            self.links.resize(id + 1, None);
        }
        self.links[id] = Some(link);
        Ok(())
    }

    /// Returns the link stored under `id`. The sentinel is never a link.
    pub fn get(&self, id: LinkId) -> Option<&Link> {
        if id == SENTINEL {
            return None;
        }
        self.links.get(id).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        if id == SENTINEL {
            return None;
        }
        self.links.get_mut(id).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: LinkId) -> bool {
        self.get(id).is_some()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates stored links in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().skip(1).flatten()
    }

    /// One past the largest id that can be stored without growing the arena.
    pub(crate) fn id_bound(&self) -> usize {
        self.links.len()
    }

    /// Direct offspring of `id`: its `child`, then that child's sister chain.
    pub fn children(&self, id: LinkId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(SENTINEL, |link| link.child),
            remaining: self.id_bound(),
        }
    }

    /// Walks `mother` pointers upwards from `id`, excluding `id` itself.
    ///
    /// Stops at the sentinel or at the first unresolved link.
    pub fn ancestors(&self, id: LinkId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).and_then(|link| link.mother).unwrap_or(SENTINEL),
            remaining: self.id_bound(),
        }
    }

    /// Pre-order ids reachable from `root`: each link, then its child subtree,
    /// then its sisters.
    ///
    /// Dangling pointers end a branch and links already emitted are skipped,
    /// so a malformed collection cannot make this loop.
    pub fn depth_first(&self, root: LinkId) -> Vec<LinkId> {
        let mut order = Vec::new();
        let mut seen = vec![false; self.id_bound()];
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(link) = self.get(id) else {
                continue;
            };
            if seen[id] {
                continue;
            }
            seen[id] = true;
            order.push(id);
            stack.push(link.sister);
            stack.push(link.child);
        }

        order
    }

    /// Checks that the collection is a single well-formed tree rooted at `root`.
    ///
    /// The root must exist and have no sister, every `child`/`sister` pointer
    /// must name a stored link other than itself, every stored link must be
    /// reached exactly once.
    pub fn validate(&self, root: LinkId) -> Result<(), TreeError> {
        let root_link = self.get(root).ok_or(TreeError::MissingRoot(root))?;
        if root_link.has_sister() {
            return Err(TreeError::RootSister {
                root,
                sister: root_link.sister,
            });
        }

        let mut seen = vec![false; self.id_bound()];
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if seen[id] {
                return Err(TreeError::Cycle(id));
            }
            seen[id] = true;

            let Some(link) = self.get(id) else {
                continue;
            };
            for next in [link.sister, link.child] {
                if next == SENTINEL {
                    continue;
                }
                if next == id {
                    return Err(TreeError::SelfReference(id));
                }
                if !self.contains(next) {
                    return Err(TreeError::DanglingReference { from: id, to: next });
                }
                stack.push(next);
            }
        }

        match self
            .iter()
            .find(|link| !seen.get(link.id).copied().unwrap_or(false))
        {
            Some(link) => Err(TreeError::Unreachable(link.id)),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<Link>> for LinkTree {
    type Error = TreeError;

    fn try_from(links: Vec<Link>) -> Result<Self, Self::Error> {
        Self::from_links(links)
    }
}

impl From<LinkTree> for Vec<Link> {
    fn from(tree: LinkTree) -> Self {
        tree.links.into_iter().flatten().collect()
    }
}

/// Iterator over the direct offspring of a link. See [`LinkTree::children`].
pub struct Children<'a> {
    tree: &'a LinkTree,
    next: LinkId,
    remaining: usize,
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let link = self.tree.get(self.next)?;
        self.next = link.sister;
        Some(link)
    }
}

/// Iterator over the resolved ancestors of a link. See [`LinkTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a LinkTree,
    next: LinkId,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let link = self.tree.get(self.next)?;
        self.next = link.mother.unwrap_or(SENTINEL);
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm() -> LinkTree {
        // 1 -> {2, 3}, 2 -> {4}
        LinkTree::from_links([
            Link::new(1, "base").with_child(2),
            Link::new(2, "shoulder").with_child(4).with_sister(3),
            Link::new(3, "sensor_mast"),
            Link::new(4, "elbow"),
        ])
        .unwrap()
    }

    #[test]
    fn insert_rejects_sentinel_and_duplicates() {
        let mut tree = LinkTree::new();
        assert_eq!(
            tree.insert(Link::new(SENTINEL, "none")),
            Err(TreeError::SentinelLink)
        );
        tree.insert(Link::new(1, "base")).unwrap();
        assert_eq!(
            tree.insert(Link::new(1, "again")),
            Err(TreeError::DuplicateLink(1))
        );
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn insert_rejects_ids_past_the_arena_limit() {
        let mut tree = LinkTree::new();
        assert_eq!(
            tree.insert(Link::new(usize::MAX, "far")),
            Err(TreeError::IdOutOfRange {
                id: usize::MAX,
                max: MAX_LINK_ID
            })
        );
        assert_eq!(
            tree.insert(Link::new(MAX_LINK_ID + 1, "just_past")),
            Err(TreeError::IdOutOfRange {
                id: MAX_LINK_ID + 1,
                max: MAX_LINK_ID
            })
        );
        assert!(tree.is_empty());
        assert_eq!(tree.id_bound(), 0);

        tree.insert(Link::new(MAX_LINK_ID, "last")).unwrap();
        assert!(tree.contains(MAX_LINK_ID));
    }

    #[test]
    fn sentinel_lookup_is_none() {
        let mut tree = arm();
        assert!(tree.get(SENTINEL).is_none());
        assert!(tree.get_mut(SENTINEL).is_none());
        assert!(!tree.contains(SENTINEL));
        assert!(tree.get(99).is_none());
    }

    #[test]
    fn sparse_ids_are_allowed() {
        let tree = LinkTree::from_links([Link::new(1, "base"), Link::new(7, "tool")]).unwrap();
        assert_eq!(tree.len(), 2);
        let ids: Vec<_> = tree.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 7]);
        assert!(!tree.contains(4));
    }

    #[test]
    fn children_follow_sister_chain() {
        let tree = arm();
        let kids: Vec<_> = tree.children(1).map(|l| l.id).collect();
        assert_eq!(kids, vec![2, 3]);
        assert_eq!(tree.children(3).count(), 0);
        assert_eq!(tree.children(SENTINEL).count(), 0);
    }

    #[test]
    fn children_stop_on_sister_cycle() {
        let tree = LinkTree::from_links([
            Link::new(1, "base").with_child(2),
            Link::new(2, "a").with_sister(3),
            Link::new(3, "b").with_sister(2),
        ])
        .unwrap();
        assert!(tree.children(1).count() <= tree.id_bound());
    }

    #[test]
    fn ancestors_stop_at_unresolved_link() {
        let tree = arm();
        assert_eq!(tree.ancestors(4).count(), 0);
    }

    #[test]
    fn depth_first_visits_child_subtree_before_sisters() {
        assert_eq!(arm().depth_first(1), vec![1, 2, 4, 3]);
    }

    #[test]
    fn depth_first_skips_dangling_and_repeated_links() {
        let tree =
            LinkTree::from_links([Link::new(1, "base").with_child(1).with_sister(8)]).unwrap();
        assert_eq!(tree.depth_first(1), vec![1]);
        assert!(tree.depth_first(SENTINEL).is_empty());
    }

    #[test]
    fn validate_accepts_well_formed_tree() {
        assert_eq!(arm().validate(1), Ok(()));
    }

    #[test]
    fn validate_reports_malformed_trees() {
        assert_eq!(arm().validate(9), Err(TreeError::MissingRoot(9)));

        let self_ref = LinkTree::from_links([Link::new(1, "base").with_child(1)]).unwrap();
        assert_eq!(self_ref.validate(1), Err(TreeError::SelfReference(1)));

        let dangling = LinkTree::from_links([Link::new(1, "base").with_child(5)]).unwrap();
        assert_eq!(
            dangling.validate(1),
            Err(TreeError::DanglingReference { from: 1, to: 5 })
        );

        let cycle = LinkTree::from_links([
            Link::new(1, "base").with_child(2),
            Link::new(2, "upper").with_child(3),
            Link::new(3, "lower").with_child(2),
        ])
        .unwrap();
        assert_eq!(cycle.validate(1), Err(TreeError::Cycle(2)));

        let shared = LinkTree::from_links([
            Link::new(1, "base").with_child(2),
            Link::new(2, "hub").with_child(3).with_sister(3),
            Link::new(3, "spoke"),
        ])
        .unwrap();
        assert_eq!(shared.validate(1), Err(TreeError::Cycle(3)));

        let orphan = LinkTree::from_links([Link::new(1, "base"), Link::new(2, "loose")]).unwrap();
        assert_eq!(orphan.validate(1), Err(TreeError::Unreachable(2)));

        let two_roots =
            LinkTree::from_links([Link::new(1, "base").with_sister(2), Link::new(2, "other")])
                .unwrap();
        assert_eq!(
            two_roots.validate(1),
            Err(TreeError::RootSister { root: 1, sister: 2 })
        );
    }
}
