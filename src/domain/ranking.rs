//! "Most wanted" ranking
//!
//! An entity is wanted by every other entity that depends on it, directly or
//! through other entities. The want count is computed all-pairs, so ranking
//! is quadratic in the number of entities on top of the traversal cost.

use std::cmp::Reverse;

use serde::Serialize;

use super::entity::Entity;
use super::graph::{Graph, Namespace};

/// An entity together with its want count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wanted<'a, E> {
    pub entity: &'a E,
    pub wanted: u32,
}

impl<E: Entity> Wanted<'_, E> {
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn to_standing(&self) -> Standing {
        Standing {
            name: self.name().to_string(),
            wanted: self.wanted,
        }
    }
}

/// Owned row of a ranking, detached from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub name: String,
    pub wanted: u32,
}

/// Computes the want count of every entity, in name order
pub fn want_counts<E: Entity>(namespace: &Namespace<E>) -> Vec<Wanted<'_, E>> {
    namespace
        .iter()
        .map(|outer| {
            let wanted = namespace
                .iter()
                .filter(|inner| namespace.is_depending_on(inner.name(), outer.name()) > 0)
                .count();
            Wanted {
                entity: outer,
                wanted: u32::try_from(wanted).unwrap_or(u32::MAX),
            }
        })
        .collect()
}

/// Ranks entities by descending want count, ties broken by name ascending
pub fn most_wanted<E: Entity>(namespace: &Namespace<E>) -> Vec<Wanted<'_, E>> {
    let mut ranking = want_counts(namespace);
    // want_counts yields name order and the sort is stable
    ranking.sort_by_key(|w| Reverse(w.wanted));
    ranking
}

impl Graph {
    /// Ranks all items, creating entities for dangling dependencies first
    pub fn item_ranking(&mut self) -> Vec<Standing> {
        self.items.resolve_dangling();
        most_wanted(&self.items).iter().map(Wanted::to_standing).collect()
    }

    /// Ranks all tags, creating entities for dangling dependencies first
    pub fn tag_ranking(&mut self) -> Vec<Standing> {
        self.tags.resolve_dangling();
        most_wanted(&self.tags).iter().map(Wanted::to_standing).collect()
    }
}
