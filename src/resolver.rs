//! Mother-pointer resolution for first-child / next-sister link trees.
//!
//! The entry point is [`TreeResolver`]. Configure it with a [`ResolverConfig`]
//! and call [`TreeResolver::resolve`] on a [`LinkTree`] whose `child`/`sister`
//! pointers are wired. Every link reachable from the start id gets its
//! `mother` filled in; nothing else is written.

use crate::error::TreeError;
use crate::link::{LinkId, ROOT, SENTINEL};
use crate::tree::LinkTree;
use tracing::{debug, trace, warn};

/// How the resolver walks the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Explicit stack. Stack usage does not grow with tree depth.
    #[default]
    Iterative,
    /// Native recursion, one call per link. Deep or wide trees can exhaust the
    /// thread stack.
    Recursive,
}

/// Configuration for mother resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// The designated root. Its mother is set to the sentinel when it is visited.
    pub root: LinkId,
    /// Traversal used to visit links.
    pub strategy: ResolveStrategy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root: ROOT,
            strategy: ResolveStrategy::Iterative,
        }
    }
}

/// Fills in `mother` pointers from `child`/`sister` pointers.
#[derive(Clone, Debug, Default)]
pub struct TreeResolver {
    config: ResolverConfig,
}

/// Pending work for the iterative walk.
enum Step {
    /// Resolve the branches of a link.
    Enter(LinkId),
    /// Give `to` its mother, then enter it.
    Adopt {
        from: LinkId,
        to: LinkId,
        mother: Option<LinkId>,
    },
}

impl TreeResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves every link reachable from `start`.
    ///
    /// For each visited link, its child gets the link itself as mother and its
    /// sister inherits the link's own mother. The child subtree is completed
    /// before the sister chain. When `start` is the configured root its mother
    /// is set to the sentinel; any other sub-root must be seeded by the caller.
    ///
    /// Starting from the sentinel does nothing. Running twice yields the same
    /// assignments.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed edge: a missing start link, a dangling
    /// pointer, a self reference, or a link reached twice. Links resolved
    /// before the failure keep their mothers.
    pub fn resolve(&self, tree: &mut LinkTree, start: LinkId) -> Result<(), TreeError> {
        if start == SENTINEL {
            return Ok(());
        }
        if !tree.contains(start) {
            warn!(start, "cannot resolve mothers: start link missing");
            return Err(TreeError::MissingRoot(start));
        }

        debug!(
            start,
            links = tree.len(),
            strategy = ?self.config.strategy,
            "resolving mother pointers"
        );

        let mut visited = vec![false; tree.id_bound()];
        let result = match self.config.strategy {
            ResolveStrategy::Iterative => self.walk(tree, start, &mut visited),
            ResolveStrategy::Recursive => self.descend(tree, start, &mut visited),
        };

        match result {
            Ok(resolved) => {
                debug!(start, resolved, "mother pointers resolved");
                Ok(())
            }
            Err(err) => {
                warn!(start, error = %err, "mother resolution aborted");
                Err(err)
            }
        }
    }

    fn walk(
        &self,
        tree: &mut LinkTree,
        start: LinkId,
        visited: &mut [bool],
    ) -> Result<usize, TreeError> {
        let mut resolved = 0;
        let mut stack = vec![Step::Enter(start)];

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Enter(id) => id,
                Step::Adopt { from, to, mother } => {
                    adopt(tree, visited, from, to, mother)?;
                    to
                }
            };

            let (child, sister, mother) = self.enter(tree, id, visited)?;
            resolved += 1;

            // Sister is pushed first so the child subtree finishes before it.
            if sister != SENTINEL {
                stack.push(Step::Adopt {
                    from: id,
                    to: sister,
                    mother,
                });
            }
            if child != SENTINEL {
                stack.push(Step::Adopt {
                    from: id,
                    to: child,
                    mother: Some(id),
                });
            }
        }

        Ok(resolved)
    }

    fn descend(
        &self,
        tree: &mut LinkTree,
        id: LinkId,
        visited: &mut [bool],
    ) -> Result<usize, TreeError> {
        if id == SENTINEL {
            return Ok(0);
        }

        let (child, sister, mother) = self.enter(tree, id, visited)?;
        let mut resolved = 1;

        if child != SENTINEL {
            adopt(tree, visited, id, child, Some(id))?;
            resolved += self.descend(tree, child, visited)?;
        }
        if sister != SENTINEL {
            adopt(tree, visited, id, sister, mother)?;
            resolved += self.descend(tree, sister, visited)?;
        }

        Ok(resolved)
    }

    /// Marks `id` visited, seeds the root, and returns `(child, sister, mother)`.
    fn enter(
        &self,
        tree: &mut LinkTree,
        id: LinkId,
        visited: &mut [bool],
    ) -> Result<(LinkId, LinkId, Option<LinkId>), TreeError> {
        let link = tree.get_mut(id).ok_or(TreeError::MissingRoot(id))?;
        if link.child == id || link.sister == id {
            return Err(TreeError::SelfReference(id));
        }

        // Every stored id is below the arena bound the slice was sized with.
        if std::mem::replace(&mut visited[id], true) {
            return Err(TreeError::Cycle(id));
        }

        if id == self.config.root {
            link.mother = Some(SENTINEL);
        }
        Ok((link.child, link.sister, link.mother))
    }
}

/// Writes `mother` into link `to`, reached through a pointer on `from`.
///
/// A link that was already visited is reported as a cycle and left untouched.
fn adopt(
    tree: &mut LinkTree,
    visited: &[bool],
    from: LinkId,
    to: LinkId,
    mother: Option<LinkId>,
) -> Result<(), TreeError> {
    let link = tree
        .get_mut(to)
        .ok_or(TreeError::DanglingReference { from, to })?;
    if visited[to] {
        return Err(TreeError::Cycle(to));
    }
    trace!(link = to, ?mother, "assigning mother");
    link.mother = mother;
    Ok(())
}

/// Resolves the whole tree from [`ROOT`] with the default configuration.
pub fn resolve_mothers(tree: &mut LinkTree) -> Result<(), TreeError> {
    TreeResolver::default().resolve(tree, ROOT)
}
