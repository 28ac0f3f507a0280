//! Graph store data
//!
//! Items and tags live in two independent name-indexed namespaces. Every
//! access by name is get-or-create, so there is no "not found" outcome.
//! Namespaces are ordered by name, which makes iteration, traversal order
//! and the saved document deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity::{null_as_default, Entity, Item, Tag};

/// Name-indexed arena owning every entity of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace<E> {
    entries: BTreeMap<String, E>,
}

impl<E> Default for Namespace<E> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<E: Entity> Namespace<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entity called `name`, creating an empty one if unknown
    pub fn get_or_create(&mut self, name: &str) -> &mut E {
        if !self.entries.contains_key(name) {
            tracing::trace!(kind = E::KIND, name, "created");
        }
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| E::named(name))
    }

    /// Looks up an entity without creating it
    pub fn get(&self, name: &str) -> Option<&E> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<E> {
        self.entries.remove(name)
    }

    /// Iterates entities in name order
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Creates an entity for every dependency that names an unknown entity
    ///
    /// Returns the names that were created.
    pub fn resolve_dangling(&mut self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .entries
            .values()
            .flat_map(|e| e.depends_on())
            .filter(|d| !self.entries.contains_key(d.as_str()))
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();

        for name in &missing {
            self.get_or_create(name);
        }
        if !missing.is_empty() {
            tracing::debug!(kind = E::KIND, count = missing.len(), "resolved dangling references");
        }
        missing
    }

    /// Makes every entity's name agree with the key it is stored under
    fn normalize_names(&mut self) {
        for (key, entity) in self.entries.iter_mut() {
            if entity.name() != key {
                tracing::warn!(
                    kind = E::KIND,
                    key = key.as_str(),
                    name = entity.name(),
                    "stored name differs from its key, using the key"
                );
                entity.set_name(key);
            }
        }
    }
}

impl<E: Entity> FromIterator<E> for Namespace<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|e| (e.name().to_string(), e))
                .collect(),
        }
    }
}

/// The whole store: all items and all tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(rename = "Items", default, deserialize_with = "null_as_default")]
    pub items: Namespace<Item>,

    #[serde(rename = "Tags", default, deserialize_with = "null_as_default")]
    pub tags: Namespace<Tag>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the item called `name`, creating it if needed
    pub fn get_item(&mut self, name: &str) -> &mut Item {
        self.items.get_or_create(name)
    }

    /// Returns the tag called `name`, creating it if needed
    pub fn get_tag(&mut self, name: &str) -> &mut Tag {
        self.tags.get_or_create(name)
    }

    /// Deletes an item
    ///
    /// With `remove_references`, every remaining item drops `name` from its
    /// dependencies. Dependents are not otherwise touched.
    pub fn remove_item(&mut self, name: &str, remove_references: bool) -> bool {
        let existed = self.items.remove(name).is_some();
        if remove_references {
            for item in self.items.iter_mut() {
                item.remove_dependency(name);
            }
        }
        tracing::debug!(name, existed, remove_references, "removed item");
        existed
    }

    /// Deletes a tag
    ///
    /// With `remove_references`, `name` is also stripped from every tag's
    /// dependencies and from every item's tags.
    pub fn remove_tag(&mut self, name: &str, remove_references: bool) -> bool {
        let existed = self.tags.remove(name).is_some();
        if remove_references {
            for tag in self.tags.iter_mut() {
                tag.remove_dependency(name);
            }
            for item in self.items.iter_mut() {
                item.remove_tag(name);
            }
        }
        tracing::debug!(name, existed, remove_references, "removed tag");
        existed
    }

    pub fn each_item(&mut self, mut f: impl FnMut(&mut Item)) {
        for item in self.items.iter_mut() {
            f(item);
        }
    }

    pub fn each_tag(&mut self, mut f: impl FnMut(&mut Tag)) {
        for tag in self.tags.iter_mut() {
            f(tag);
        }
    }

    /// Replaces the tags and dependencies of the item named by `item`
    pub fn put_item(&mut self, item: Item) -> &mut Item {
        let stored = self.items.get_or_create(&item.name);
        stored.tags = item.tags;
        stored.depends_on = item.depends_on;
        stored
    }

    /// Replaces the dependencies of the tag named by `tag`
    pub fn put_tag(&mut self, tag: Tag) -> &mut Tag {
        let stored = self.tags.get_or_create(&tag.name);
        stored.depends_on = tag.depends_on;
        stored
    }

    /// Makes item `from` depend on item `to`, creating both if needed
    ///
    /// With `dedup`, an edge that already exists is not added again.
    pub fn add_item_dependency(&mut self, from: &str, to: &str, dedup: bool) {
        self.items.get_or_create(to);
        add_edge(self.items.get_or_create(from), to, dedup);
    }

    pub fn remove_item_dependency(&mut self, from: &str, to: &str) {
        self.get_item(from).remove_dependency(to);
    }

    /// Makes tag `from` depend on tag `to`, creating both if needed
    pub fn add_tag_dependency(&mut self, from: &str, to: &str, dedup: bool) {
        self.tags.get_or_create(to);
        add_edge(self.tags.get_or_create(from), to, dedup);
    }

    pub fn remove_tag_dependency(&mut self, from: &str, to: &str) {
        self.get_tag(from).remove_dependency(to);
    }

    /// Attaches `tag` to `item`, creating both if needed
    pub fn tag_item(&mut self, item: &str, tag: &str) {
        self.get_tag(tag);
        self.get_item(item).add_tag(tag);
    }

    pub fn untag_item(&mut self, item: &str, tag: &str) {
        self.get_item(item).remove_tag(tag);
    }

    /// Returns every item carrying at least one of the given tags
    pub fn items_for_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| tags.iter().any(|t| item.has_tag(t.as_ref())))
            .collect()
    }

    pub(crate) fn normalize_names(&mut self) {
        self.items.normalize_names();
        self.tags.normalize_names();
    }
}

fn add_edge<E: Entity>(entity: &mut E, to: &str, dedup: bool) {
    if dedup && entity.has_dependency(to) {
        tracing::debug!(kind = E::KIND, from = entity.name(), to, "edge already present");
        return;
    }
    entity.add_dependency(to);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_creates_once() {
        let mut graph = Graph::new();
        graph.get_item("n1").add_dependency("n2");

        assert_eq!(graph.get_item("n1").depends_on, vec!["n2"]);
        assert_eq!(graph.items.len(), 1);
    }

    #[test]
    fn items_and_tags_are_separate_namespaces() {
        let mut graph = Graph::new();
        graph.get_item("same");
        graph.get_tag("same").add_dependency("other");

        assert!(graph.items.contains("same"));
        assert!(graph.get_item("same").depends_on.is_empty());
        assert_eq!(graph.tags.len(), 1);
    }

    #[test]
    fn remove_item_with_references() {
        let mut graph = Graph::new();
        graph.get_item("n1");
        graph.get_item("n2").add_dependency("n1");

        assert!(graph.remove_item("n1", true));

        assert!(!graph.items.contains("n1"));
        assert!(graph.get_item("n2").depends_on.is_empty());
    }

    #[test]
    fn remove_item_without_references_leaves_dangling_edge() {
        let mut graph = Graph::new();
        graph.get_item("n1");
        graph.get_item("n2").add_dependency("n1");

        graph.remove_item("n1", false);

        assert!(!graph.items.contains("n1"));
        assert_eq!(graph.get_item("n2").depends_on, vec!["n1"]);
    }

    #[test]
    fn remove_tag_with_references() {
        let mut graph = Graph::new();
        graph.get_tag("t1");
        graph.get_tag("t2").add_dependency("t1");
        graph.get_item("n1").add_tag("t1");
        graph.get_item("n2").add_tag("t2");

        graph.remove_tag("t1", true);

        assert!(!graph.tags.contains("t1"));
        assert!(graph.get_item("n1").tags.is_empty());
        assert!(graph.get_tag("t2").depends_on.is_empty());
        assert_eq!(graph.get_item("n2").tags, vec!["t2"]);
    }

    #[test]
    fn remove_tag_without_references_keeps_item_tags() {
        let mut graph = Graph::new();
        graph.get_tag("t1");
        graph.get_item("n1").add_tag("t1");

        graph.remove_tag("t1", false);

        assert!(!graph.tags.contains("t1"));
        assert_eq!(graph.get_item("n1").tags, vec!["t1"]);
    }

    #[test]
    fn remove_unknown_is_harmless() {
        let mut graph = Graph::new();
        assert!(!graph.remove_item("ghost", true));
        assert!(!graph.remove_tag("ghost", true));
    }

    #[test]
    fn each_item_mutates_in_place() {
        let mut graph = Graph::new();
        graph.get_item("n1");
        graph.get_item("n2");

        graph.each_item(|item| item.add_tag("all"));

        assert_eq!(graph.items_for_tags(&["all"]).len(), 2);
    }

    #[test]
    fn put_item_replaces_lists() {
        let mut graph = Graph::new();
        graph.get_item("n1").add_tag("old");

        graph.put_item(Item {
            name: "n1".into(),
            tags: vec!["t1".into()],
            depends_on: vec!["n2".into()],
        });

        let item = graph.get_item("n1");
        assert_eq!(item.tags, vec!["t1"]);
        assert_eq!(item.depends_on, vec!["n2"]);
    }

    #[test]
    fn items_for_tags_matches_any() {
        let mut graph = Graph::new();
        graph.get_item("n1").add_tag("t1");
        graph.get_item("n2").add_tag("t2");
        graph.get_item("n3").add_tag("t3");

        let names: Vec<_> = graph
            .items_for_tags(&["t1", "t2"])
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["n1", "n2"]);
    }

    #[test]
    fn resolve_dangling_creates_missing_targets() {
        let mut graph = Graph::new();
        graph.get_item("n1").add_dependency("ghost");
        graph.get_item("n2").add_dependency("ghost");

        let created = graph.items.resolve_dangling();

        assert_eq!(created, vec!["ghost"]);
        assert!(graph.items.contains("ghost"));
        assert!(graph.items.resolve_dangling().is_empty());
    }

    #[test]
    fn normalize_uses_key() {
        let mut graph: Graph =
            serde_json::from_str(r#"{"Items":{"n1":{"Name":"other"}},"Tags":{"t1":{}}}"#).unwrap();
        graph.normalize_names();

        assert_eq!(graph.items.get("n1").map(|i| i.name.as_str()), Some("n1"));
        assert_eq!(graph.tags.get("t1").map(|t| t.name.as_str()), Some("t1"));
    }
}
