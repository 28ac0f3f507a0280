//! Renaming entities and rewriting references to them
//!
//! The steps run in a fixed order: the old entity is fetched and removed
//! *without* reference cleanup, its contents are copied over the new name,
//! and only then is every reference rewritten. Because removal leaves other
//! entities untouched, the final scan still sees every reference to the old
//! name. Renaming onto an existing name overwrites that entity.

use super::entity::Entity;
use super::graph::{Graph, Namespace};

/// Moves the entity at `old` to `new` inside one namespace
fn move_entity<E: Entity>(namespace: &mut Namespace<E>, old: &str, new: &str) {
    let moved = namespace.get_or_create(old).clone();
    namespace.remove(old);

    let target = namespace.get_or_create(new);
    *target = moved;
    target.set_name(new);

    for entity in namespace.iter_mut() {
        entity.rename_dependency(old, new);
    }
}

impl Graph {
    /// Renames an item and rewrites every item dependency on it
    pub fn rename_item(&mut self, old: &str, new: &str) {
        move_entity(&mut self.items, old, new);
        tracing::debug!(old, new, "renamed item");
    }

    /// Renames a tag and rewrites tag dependencies and item tags
    pub fn rename_tag(&mut self, old: &str, new: &str) {
        move_entity(&mut self.tags, old, new);
        for item in self.items.iter_mut() {
            item.rename_tag(old, new);
        }
        tracing::debug!(old, new, "renamed tag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_item_rewrites_dependents() {
        let mut graph = Graph::new();
        graph.get_tag("t1");
        graph.get_item("n3");
        graph.get_item("n2").add_tag("t1");
        graph.get_item("n2").add_dependency("n3");
        graph.get_item("n1").add_dependency("n2");

        graph.rename_item("n2", "ntwo");

        assert!(!graph.items.contains("n2"));
        assert_eq!(graph.get_item("n1").depends_on, vec!["ntwo"]);

        let renamed = graph.get_item("ntwo");
        assert_eq!(renamed.name, "ntwo");
        assert_eq!(renamed.tags, vec!["t1"]);
        assert_eq!(renamed.depends_on, vec!["n3"]);
    }

    #[test]
    fn rename_tag_rewrites_items_and_tags() {
        let mut graph = Graph::new();
        graph.get_tag("t3");
        graph.get_tag("t2").add_dependency("t3");
        graph.get_tag("t1").add_dependency("t2");
        graph.get_item("n1").add_tag("t2");

        graph.rename_tag("t2", "ttwo");

        assert!(!graph.tags.contains("t2"));
        assert_eq!(graph.get_item("n1").tags, vec!["ttwo"]);
        assert_eq!(graph.get_tag("t1").depends_on, vec!["ttwo"]);
        assert_eq!(graph.get_tag("ttwo").depends_on, vec!["t3"]);
    }

    #[test]
    fn rename_overwrites_existing_target() {
        let mut graph = Graph::new();
        graph.get_item("a").add_tag("from-a");
        graph.get_item("b").add_tag("from-b");

        graph.rename_item("a", "b");

        assert_eq!(graph.items.len(), 1);
        assert_eq!(graph.get_item("b").tags, vec!["from-a"]);
    }

    #[test]
    fn rename_unknown_creates_target() {
        let mut graph = Graph::new();
        graph.get_item("n1").add_dependency("ghost");

        graph.rename_item("ghost", "real");

        assert!(graph.items.contains("real"));
        assert!(!graph.items.contains("ghost"));
        assert_eq!(graph.get_item("n1").depends_on, vec!["real"]);
    }

    #[test]
    fn rename_to_same_name_is_stable() {
        let mut graph = Graph::new();
        graph.get_item("a").add_dependency("b");
        graph.get_item("b");
        let before = graph.clone();

        graph.rename_item("a", "a");

        assert_eq!(graph, before);
    }

    #[test]
    fn rename_rewrites_self_references() {
        let mut graph = Graph::new();
        graph.get_item("a").depends_on.push("a".into());

        graph.rename_item("a", "z");

        assert_eq!(graph.get_item("z").depends_on, vec!["z"]);
    }

    #[test]
    fn rename_item_ignores_tags_namespace() {
        let mut graph = Graph::new();
        graph.get_item("x");
        graph.get_tag("x");
        graph.get_item("n1").add_tag("x");

        graph.rename_item("x", "y");

        assert!(graph.tags.contains("x"));
        assert_eq!(graph.get_item("n1").tags, vec!["x"]);
    }
}
