//! Ranking and projection commands
//!
//! Ranking creates entities for dependencies that are not stored yet, so
//! these commands save afterwards like any other mutating call.

use std::io;

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{Graph, RankedTree};
use crate::storage::{write_stream, Workspace};

/// Prints the ranking of items or tags, most wanted first
pub fn rank(workspace: &Workspace, output: &Output, tags: bool) -> Result<()> {
    let standings = if tags {
        workspace.commit(Graph::tag_ranking)?
    } else {
        workspace.commit(Graph::item_ranking)?
    };

    if output.is_json() {
        output.data(&standings);
        return Ok(());
    }

    if standings.is_empty() {
        println!("Nothing to rank.");
        return Ok(());
    }
    for standing in &standings {
        let wanted = standing.wanted.to_string();
        output.row(&[wanted.as_str(), standing.name.as_str()]);
    }
    Ok(())
}

/// Prints the ranked tree, indented by depth
///
/// An entity is printed once under each of its dependencies, so layered
/// graphs with many shared dependencies produce long output.
pub fn tree(workspace: &Workspace, output: &Output, tags: bool) -> Result<()> {
    let tree = if tags {
        workspace.commit(Graph::tag_tree)?
    } else {
        workspace.commit(Graph::item_tree)?
    };

    if output.is_json() {
        output.data(&tree);
        return Ok(());
    }

    if tree.roots.is_empty() {
        println!("Nothing to show.");
        return Ok(());
    }
    let mut path = Vec::new();
    for &root in &tree.roots {
        print_node(&tree, root, 0, &mut path);
    }
    Ok(())
}

fn print_node(tree: &RankedTree, index: usize, depth: usize, path: &mut Vec<usize>) {
    let Some(node) = tree.node(index) else {
        return;
    };
    let indent = "  ".repeat(depth);

    if path.contains(&index) {
        println!("{}{} (cycle)", indent, node.name);
        return;
    }
    println!("{}{} ({})", indent, node.name, node.weight);

    path.push(index);
    for &child in &node.children {
        print_node(tree, child, depth + 1, path);
    }
    path.pop();
}

/// Prints the vis.js dataset of the item graph
pub fn vis(workspace: &Workspace, output: &Output) -> Result<()> {
    let dataset = workspace.commit(Graph::item_vis_dataset)?;

    output.verbose_ctx(
        "vis",
        &format!("{} nodes, {} edges", dataset.nodes.len(), dataset.edges.len()),
    );
    output.data(&dataset);
    Ok(())
}

/// Prints the item tree as Graphviz DOT
pub fn dot(workspace: &Workspace) -> Result<()> {
    let rendered = workspace.commit(Graph::item_dot)?;

    print!("{}", rendered);
    Ok(())
}

/// Streams the whole store to stdout as compact JSON
pub fn export(workspace: &Workspace) -> Result<()> {
    workspace
        .store()
        .read(|graph| write_stream(graph, io::stdout().lock()))
        .context("Failed to export store")
}

/// Prints the application name
pub fn name(workspace: &Workspace, output: &Output) {
    let name = workspace.app_name();
    if output.is_json() {
        output.data(&serde_json::json!({ "name": name }));
    } else {
        println!("{}", name);
    }
}
