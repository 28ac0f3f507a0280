//! Tag CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Entity, Tag};
use crate::storage::Workspace;

#[derive(Subcommand)]
pub enum TagCommands {
    /// Create a tag or replace its dependencies
    Put {
        /// Tag name
        name: String,

        /// Tag this one depends on (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
    },

    /// Show a tag, creating it if it does not exist
    Show {
        /// Tag name
        name: String,
    },

    /// List all tags
    List,

    /// Remove a tag
    Remove {
        /// Tag name
        name: String,

        /// Leave tag dependencies and item tags pointing at it
        #[arg(long)]
        keep_references: bool,
    },

    /// Rename a tag, rewriting tag dependencies and item tags
    Rename {
        /// Current name
        old: String,

        /// New name (an existing tag of that name is replaced)
        new: String,
    },

    /// Add a dependency between tags
    Dep {
        /// Tag that depends on the other
        tag: String,

        /// Tag it depends on
        depends_on: String,
    },

    /// Remove a dependency
    Undep {
        /// Tag to update
        tag: String,

        /// Dependency to remove
        depends_on: String,
    },
}

pub fn run(cmd: TagCommands, workspace: &Workspace, output: &Output) -> Result<()> {
    match cmd {
        TagCommands::Put { name, depends_on } => {
            let stored = workspace.commit(|g| g.put_tag(Tag { name, depends_on }).clone())?;
            print_tag(output, &stored);
        }
        TagCommands::Show { name } => {
            let tag = workspace.commit(|g| g.get_tag(&name).clone())?;
            print_tag(output, &tag);
        }
        TagCommands::List => {
            let tags: Vec<Tag> = workspace.store().read(|g| g.tags.iter().cloned().collect());
            if output.is_json() {
                output.data(&tags);
            } else if tags.is_empty() {
                println!("No tags found.");
            } else {
                for tag in &tags {
                    let depends_on = tag.depends_on.join(", ");
                    output.row(&[tag.name(), depends_on.as_str()]);
                }
            }
        }
        TagCommands::Remove { name, keep_references } => {
            let existed = workspace.commit(|g| g.remove_tag(&name, !keep_references))?;
            if existed {
                output.success(&format!("Removed tag {}", name));
            } else {
                output.success(&format!("No tag named {}", name));
            }
        }
        TagCommands::Rename { old, new } => {
            output.verbose_ctx("tag", &format!("Renaming {} to {}", old, new));
            workspace.commit(|g| g.rename_tag(&old, &new))?;
            output.success(&format!("Renamed tag {} to {}", old, new));
        }
        TagCommands::Dep { tag, depends_on } => {
            let dedup = workspace.dedup_edges();
            workspace.commit(|g| g.add_tag_dependency(&tag, &depends_on, dedup))?;
            output.success(&format!("{} now depends on {}", tag, depends_on));
        }
        TagCommands::Undep { tag, depends_on } => {
            workspace.commit(|g| g.remove_tag_dependency(&tag, &depends_on))?;
            output.success(&format!("{} no longer depends on {}", tag, depends_on));
        }
    }

    Ok(())
}

fn print_tag(output: &Output, tag: &Tag) {
    if output.is_json() {
        output.data(tag);
        return;
    }
    println!("Tag: {}", tag.name);
    if !tag.depends_on.is_empty() {
        println!("Depends on: {}", tag.depends_on.join(", "));
    }
}
