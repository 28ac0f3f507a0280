//! Cycle-safe reachability between entities of the same kind
//!
//! The search is a depth-first walk over dependency edges in stored order,
//! driven by an explicit path stack so long chains cannot exhaust the thread
//! stack. A visited set keyed by name guarantees termination on cyclic graphs.
//! The reported hop count is the depth at which the *first* successful
//! branch reaches the target, which is not necessarily the shortest path.

use std::collections::HashSet;

use super::entity::Entity;
use super::graph::Namespace;

/// Returned when the target cannot be reached
pub const UNREACHABLE: i32 = -1;

/// Checks whether `from` depends on `to`, directly or transitively
///
/// Returns `0` if both names are the same, the hop count if `to` is
/// reachable, and [`UNREACHABLE`] otherwise. References to unknown names
/// behave as entities without dependencies.
pub fn is_depending_on<'a, E: Entity>(
    namespace: &'a Namespace<E>,
    from: &'a str,
    to: &str,
) -> i32 {
    if from == to {
        return 0;
    }

    let mut visited: HashSet<&'a str> = HashSet::from([from]);
    // (entity, index of the next dependency to try); the stack is the current path
    let mut path: Vec<(&'a str, usize)> = vec![(from, 0)];

    while let Some(frame) = path.last_mut() {
        let (current, next) = *frame;
        frame.1 += 1;

        let Some(dependency) = dependencies(namespace, current).get(next) else {
            path.pop();
            continue;
        };
        let dependency = dependency.as_str();
        if !visited.insert(dependency) {
            continue;
        }
        if dependency == to {
            return i32::try_from(path.len()).unwrap_or(i32::MAX);
        }
        path.push((dependency, 0));
    }

    UNREACHABLE
}

fn dependencies<'a, E: Entity>(namespace: &'a Namespace<E>, name: &str) -> &'a [String] {
    namespace.get(name).map(|e| e.depends_on()).unwrap_or(&[])
}

impl<E: Entity> Namespace<E> {
    /// See [`is_depending_on`]
    pub fn is_depending_on(&self, from: &str, to: &str) -> i32 {
        is_depending_on(self, from, to)
    }
}
