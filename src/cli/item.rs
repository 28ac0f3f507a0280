//! Item CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Entity, Item};
use crate::storage::Workspace;

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Create an item or replace its tags and dependencies
    ///
    /// Examples:
    ///   prioritize item put deploy --tag ops --depends-on build
    ///   prioritize item put build                  # clears tags and dependencies
    Put {
        /// Item name
        name: String,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Item this one depends on (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
    },

    /// Show an item, creating it if it does not exist
    Show {
        /// Item name
        name: String,
    },

    /// List items, optionally only those carrying one of the given tags
    List {
        /// Tag filter (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Remove an item
    Remove {
        /// Item name
        name: String,

        /// Leave dependency edges of other items pointing at it
        #[arg(long)]
        keep_references: bool,
    },

    /// Rename an item, rewriting every dependency on it
    Rename {
        /// Current name
        old: String,

        /// New name (an existing item of that name is replaced)
        new: String,
    },

    /// Add a dependency between items
    Dep {
        /// Item that depends on the other
        item: String,

        /// Item it depends on
        depends_on: String,
    },

    /// Remove a dependency
    Undep {
        /// Item to update
        item: String,

        /// Dependency to remove
        depends_on: String,
    },

    /// Attach a tag to an item
    Tag {
        /// Item name
        item: String,

        /// Tag name
        tag: String,
    },

    /// Detach a tag from an item
    Untag {
        /// Item name
        item: String,

        /// Tag name
        tag: String,
    },
}

pub fn run(cmd: ItemCommands, workspace: &Workspace, output: &Output) -> Result<()> {
    match cmd {
        ItemCommands::Put { name, tags, depends_on } => {
            put_item(workspace, output, Item { name, tags, depends_on })
        }
        ItemCommands::Show { name } => show_item(workspace, output, &name),
        ItemCommands::List { tags } => list_items(workspace, output, &tags),
        ItemCommands::Remove { name, keep_references } => {
            remove_item(workspace, output, &name, !keep_references)
        }
        ItemCommands::Rename { old, new } => {
            output.verbose_ctx("item", &format!("Renaming {} to {}", old, new));
            workspace.commit(|g| g.rename_item(&old, &new))?;
            output.success(&format!("Renamed item {} to {}", old, new));
            Ok(())
        }
        ItemCommands::Dep { item, depends_on } => {
            let dedup = workspace.dedup_edges();
            workspace.commit(|g| g.add_item_dependency(&item, &depends_on, dedup))?;
            output.success(&format!("{} now depends on {}", item, depends_on));
            Ok(())
        }
        ItemCommands::Undep { item, depends_on } => {
            workspace.commit(|g| g.remove_item_dependency(&item, &depends_on))?;
            output.success(&format!("{} no longer depends on {}", item, depends_on));
            Ok(())
        }
        ItemCommands::Tag { item, tag } => {
            workspace.commit(|g| g.tag_item(&item, &tag))?;
            output.success(&format!("Tagged {} with {}", item, tag));
            Ok(())
        }
        ItemCommands::Untag { item, tag } => {
            workspace.commit(|g| g.untag_item(&item, &tag))?;
            output.success(&format!("Removed tag {} from {}", tag, item));
            Ok(())
        }
    }
}

fn put_item(workspace: &Workspace, output: &Output, item: Item) -> Result<()> {
    output.verbose_ctx(
        "item",
        &format!(
            "Putting {} with {} tag(s) and {} dependency(ies)",
            item.name,
            item.tags.len(),
            item.depends_on.len()
        ),
    );
    let stored = workspace.commit(|g| g.put_item(item).clone())?;

    if output.is_json() {
        output.data(&stored);
    } else {
        print_item(&stored);
    }
    Ok(())
}

fn show_item(workspace: &Workspace, output: &Output, name: &str) -> Result<()> {
    let item = workspace.commit(|g| g.get_item(name).clone())?;

    if output.is_json() {
        output.data(&item);
    } else {
        print_item(&item);
    }
    Ok(())
}

fn list_items(workspace: &Workspace, output: &Output, tags: &[String]) -> Result<()> {
    let items: Vec<Item> = if tags.is_empty() {
        workspace.store().read(|g| g.items.iter().cloned().collect())
    } else {
        workspace.store().items_for_tags(tags)
    };

    if output.is_json() {
        output.data(&items);
        return Ok(());
    }

    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }
    for item in &items {
        let tags = item.tags.join(", ");
        output.row(&[item.name(), tags.as_str()]);
    }
    Ok(())
}

fn remove_item(
    workspace: &Workspace,
    output: &Output,
    name: &str,
    remove_references: bool,
) -> Result<()> {
    let existed = workspace.commit(|g| g.remove_item(name, remove_references))?;

    if existed {
        output.success(&format!("Removed item {}", name));
    } else {
        output.success(&format!("No item named {}", name));
    }
    Ok(())
}

fn print_item(item: &Item) {
    println!("Item: {}", item.name);
    if !item.tags.is_empty() {
        println!("Tags: {}", item.tags.join(", "));
    }
    if !item.depends_on.is_empty() {
        println!("Depends on: {}", item.depends_on.join(", "));
    }
}
