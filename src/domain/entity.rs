//! Item and tag records
//!
//! Both entity kinds carry a name and an ordered list of names they depend
//! on. Items additionally carry an ordered list of tag names. References are
//! plain strings and may point at names that do not exist (yet).

use serde::{Deserialize, Deserializer, Serialize};

/// Behaviour shared by items and tags
///
/// The dependency-edge primitives are provided here once so traversal,
/// ranking and renaming can be written generically over the entity kind.
pub trait Entity: Clone + Default {
    /// Label used in log output ("item" or "tag")
    const KIND: &'static str;

    /// Creates a zero-valued entity with the given name
    fn named(name: &str) -> Self;

    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    /// Names this entity depends on, in insertion order
    fn depends_on(&self) -> &[String];

    fn depends_on_mut(&mut self) -> &mut Vec<String>;

    /// Appends a dependency edge to `dependency`
    ///
    /// Adding a dependency on itself is a no-op. Duplicate edges are kept.
    fn add_dependency(&mut self, dependency: &str) {
        if self.name() != dependency {
            self.depends_on_mut().push(dependency.to_string());
        }
    }

    /// Removes every edge to `dependency`
    fn remove_dependency(&mut self, dependency: &str) {
        self.depends_on_mut().retain(|d| d != dependency);
    }

    /// Returns true if there is at least one direct edge to `dependency`
    fn has_dependency(&self, dependency: &str) -> bool {
        self.depends_on().iter().any(|d| d == dependency)
    }

    /// Rewrites every edge to `old` so it points at `new`
    fn rename_dependency(&mut self, old: &str, new: &str) {
        rewrite(self.depends_on_mut(), old, new);
    }
}

/// A unit of work whose priority follows from what depends on it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(
        rename = "Tags",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    #[serde(
        rename = "DependsOn",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<String>,
}

impl Item {
    /// Appends a tag name; duplicates are not filtered
    pub fn add_tag(&mut self, tag: &str) {
        self.tags.push(tag.to_string());
    }

    /// Removes every occurrence of a tag name
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Rewrites every occurrence of tag `old` to `new`
    pub fn rename_tag(&mut self, old: &str, new: &str) {
        rewrite(&mut self.tags, old, new);
    }
}

impl Entity for Item {
    const KIND: &'static str = "item";

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn depends_on_mut(&mut self) -> &mut Vec<String> {
        &mut self.depends_on
    }
}

/// A label attached to items; tags form their own dependency graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(
        rename = "DependsOn",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<String>,
}

impl Entity for Tag {
    const KIND: &'static str = "tag";

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn depends_on_mut(&mut self) -> &mut Vec<String> {
        &mut self.depends_on
    }
}

fn rewrite(names: &mut [String], old: &str, new: &str) {
    for name in names.iter_mut().filter(|n| n.as_str() == old) {
        *name = new.to_string();
    }
}

/// Accepts an explicit `null` wherever a defaultable value is expected
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_dependency_appends_in_order() {
        let mut item = Item::named("n1");
        item.add_dependency("n2");
        item.add_dependency("n3");

        assert_eq!(item.depends_on, vec!["n2", "n3"]);
    }

    #[test]
    fn add_dependency_on_self_is_ignored() {
        let mut tag = Tag::named("t1");
        tag.add_dependency("t1");

        assert!(tag.depends_on.is_empty());
    }

    #[test]
    fn duplicate_dependencies_are_kept() {
        let mut item = Item::named("n1");
        item.add_dependency("n2");
        item.add_dependency("n2");

        assert_eq!(item.depends_on.len(), 2);
    }

    #[test]
    fn remove_dependency_keeps_the_rest() {
        let mut item = Item::named("n2");
        item.add_dependency("n1");
        item.add_dependency("n3");
        item.add_dependency("n1");

        item.remove_dependency("n1");

        assert_eq!(item.depends_on, vec!["n3"]);
    }

    #[test]
    fn tags_allow_duplicates_and_remove_all() {
        let mut item = Item::named("n1");
        item.add_tag("t1");
        item.add_tag("t2");
        item.add_tag("t1");
        assert_eq!(item.tags.len(), 3);

        item.remove_tag("t1");
        assert_eq!(item.tags, vec!["t2"]);
    }

    #[test]
    fn rename_rewrites_every_occurrence() {
        let mut item = Item::named("n1");
        item.add_dependency("old");
        item.add_dependency("other");
        item.add_dependency("old");
        item.add_tag("old");

        item.rename_dependency("old", "new");

        assert_eq!(item.depends_on, vec!["new", "other", "new"]);
        assert_eq!(item.tags, vec!["old"]);
    }

    #[test]
    fn empty_lists_are_omitted() {
        let item = Item::named("n1");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"Name":"n1"}"#);

        let mut tag = Tag::named("t2");
        tag.add_dependency("t1");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, r#"{"Name":"t2","DependsOn":["t1"]}"#);
    }

    #[test]
    fn null_and_missing_lists_decode_as_empty() {
        let item: Item =
            serde_json::from_str(r#"{"Name":"n1","Tags":null,"DependsOn":[]}"#).unwrap();
        assert!(item.tags.is_empty());
        assert!(item.depends_on.is_empty());

        let tag: Tag = serde_json::from_str(r#"{"Name":"t1"}"#).unwrap();
        assert!(tag.depends_on.is_empty());
    }

    proptest! {
        #[test]
        fn never_depends_on_itself(name in "[a-z]{1,6}", deps in proptest::collection::vec("[a-z]{1,6}", 0..8)) {
            let mut item = Item::named(&name);
            for dep in &deps {
                item.add_dependency(dep);
            }
            item.add_dependency(&name);

            prop_assert!(!item.has_dependency(&name));
        }
    }
}
