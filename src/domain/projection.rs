//! Read models for graph renderers
//!
//! Three projections are derived from a ranking:
//!
//! - a ranked tree, where entities without dependencies hang off an implicit
//!   root and every other entity is attached below *each* of its
//!   dependencies (so it may appear several times)
//! - a node/edge dataset in the shape vis.js expects
//! - a Graphviz DOT rendering of the ranked tree

use std::collections::{HashMap, HashSet};

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use super::entity::{Entity, Item};
use super::graph::Graph;
use super::ranking::{most_wanted, Wanted};

/// First identifier handed out by [`vis_dataset`]; 1 is never used
pub const FIRST_VIS_ID: u32 = 2;

/// Number of groups above group 0
const GROUP_STEPS: u64 = 5;

/// One node of a [`RankedTree`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub weight: u32,
    /// Indexes into [`RankedTree::nodes`]
    pub children: Vec<usize>,
}

/// Multi-parent tree built from a ranking
///
/// Nodes are stored once in an arena and referenced by index, so a node
/// reachable from several parents is shared rather than copied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankedTree {
    /// Children of the implicit root
    pub roots: Vec<usize>,
    pub nodes: Vec<TreeNode>,
}

impl RankedTree {
    pub fn node(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Names of the children of the node called `name`
    pub fn children_of(&self, name: &str) -> Vec<&str> {
        self.find(name)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|&i| self.node(i))
                    .map(|c| c.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Builds the ranked tree from a ranking
pub fn ranked_tree<E: Entity>(ranking: &[Wanted<'_, E>]) -> RankedTree {
    let mut tree = RankedTree::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut node_for = |tree: &mut RankedTree, name: &str| -> usize {
        *index.entry(name.to_string()).or_insert_with(|| {
            tree.nodes.push(TreeNode {
                name: name.to_string(),
                weight: 0,
                children: Vec::new(),
            });
            tree.nodes.len() - 1
        })
    };

    for wanted in ranking {
        let node = node_for(&mut tree, wanted.name());
        tree.nodes[node].weight = wanted.wanted;

        let dependencies = wanted.entity.depends_on();
        if dependencies.is_empty() {
            tree.roots.push(node);
        } else {
            for dependency in dependencies {
                let parent = node_for(&mut tree, dependency);
                tree.nodes[parent].children.push(node);
            }
        }
    }

    tree
}

/// Node of a vis.js network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisNode {
    pub id: u32,
    pub label: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub value: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,
}

/// Edge of a vis.js network, pointing from dependent to dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisEdge {
    pub from: u32,
    pub to: u32,
}

/// Nodes and edges for a vis.js network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisDataSet {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Maps a want count to one of six groups relative to the maximum
///
/// Computes `floor(value / (max / 5))` exactly. Anything that does not land
/// in `0..=5` (including every value when `max` is zero) is group 0.
pub fn group_for(value: u32, max: u32) -> u8 {
    if max == 0 {
        return 0;
    }
    let group = u64::from(value) * GROUP_STEPS / u64::from(max);
    u8::try_from(group)
        .ok()
        .filter(|g| u64::from(*g) <= GROUP_STEPS)
        .unwrap_or(0)
}

/// Builds the vis.js dataset from an item ranking
pub fn vis_dataset(ranking: &[Wanted<'_, Item>]) -> VisDataSet {
    let mut ids: HashMap<&str, u32> = HashMap::new();
    let mut data = VisDataSet::default();
    let mut pending: Vec<(&str, &str)> = Vec::new();

    for (wanted, id) in ranking.iter().zip(FIRST_VIS_ID..) {
        let item = wanted.entity;
        ids.insert(item.name.as_str(), id);
        data.nodes.push(VisNode {
            id,
            label: item.name.clone(),
            value: wanted.wanted,
            title: item.tags.join(", "),
            group: String::new(),
        });
        pending.extend(item.depends_on.iter().map(|d| (item.name.as_str(), d.as_str())));
    }

    let max = data.nodes.iter().map(|n| n.value).max().unwrap_or(0);
    for node in &mut data.nodes {
        node.group = format!("group{}", group_for(node.value, max));
    }

    for (from, to) in pending {
        match (ids.get(from), ids.get(to)) {
            (Some(&from), Some(&to)) => data.edges.push(VisEdge { from, to }),
            _ => tracing::debug!(from, to, "skipping edge to an unranked item"),
        }
    }

    data
}

/// Fill and font colour for a node with the given want count
fn colors(weight: u32) -> (&'static str, &'static str) {
    match weight {
        3 => ("yellow", "black"),
        4 => ("green", "black"),
        5 => ("lightblue", "black"),
        6 => ("blue", "white"),
        7 => ("magenta", "white"),
        w if w > 8 => ("red", "white"),
        _ => ("grey", "black"),
    }
}

/// Renders the ranked tree as a Graphviz digraph
///
/// Edges point from an entity to the entity it depends on and the layout
/// runs bottom to top, so the most wanted entities end up at the top.
pub fn to_dot(tree: &RankedTree) -> String {
    let mut graph: DiGraph<String, u32> = DiGraph::new();
    let mut placed: HashMap<usize, NodeIndex> = HashMap::new();
    let mut edges: HashSet<(usize, usize)> = HashSet::new();
    let mut expanded: HashSet<usize> = HashSet::new();

    // (node, parent) pairs still to visit, depth first in stored order
    let mut stack: Vec<(usize, Option<usize>)> =
        tree.roots.iter().rev().map(|&r| (r, None)).collect();

    while let Some((index, parent)) = stack.pop() {
        let Some(node) = tree.node(index) else {
            continue;
        };
        let here = *placed
            .entry(index)
            .or_insert_with(|| graph.add_node(node.name.clone()));

        if let Some(parent) = parent {
            if edges.insert((index, parent)) {
                graph.add_edge(here, placed[&parent], node.weight);
            }
        }

        if expanded.insert(index) {
            stack.extend(node.children.iter().rev().map(|&c| (c, Some(index))));
        }
    }

    let weights: HashMap<NodeIndex, u32> = placed
        .iter()
        .filter_map(|(&i, &n)| tree.node(i).map(|node| (n, node.weight)))
        .collect();

    let node_attrs = |_: &DiGraph<String, u32>, (index, _): (NodeIndex, &String)| {
        let (color, fontcolor) = colors(weights.get(&index).copied().unwrap_or(0));
        format!("shape = box style = filled fontsize = 16 color = {color} fontcolor = {fontcolor}")
    };
    let body = Dot::with_attr_getters(
        &graph,
        &[Config::GraphContentOnly, Config::EdgeNoLabel],
        &|_, edge| format!("weight = {} arrowsize = 0.6", edge.weight()),
        &node_attrs,
    );

    format!(
        "digraph G {{\n    concentrate = true\n    nodesep = 0.5\n    ranksep = \"0.3 equally\"\n    rankdir = BT\n{body}}}\n"
    )
}

impl Graph {
    pub fn item_tree(&mut self) -> RankedTree {
        self.items.resolve_dangling();
        ranked_tree(&most_wanted(&self.items))
    }

    pub fn tag_tree(&mut self) -> RankedTree {
        self.tags.resolve_dangling();
        ranked_tree(&most_wanted(&self.tags))
    }

    pub fn item_vis_dataset(&mut self) -> VisDataSet {
        self.items.resolve_dangling();
        vis_dataset(&most_wanted(&self.items))
    }

    /// Renders the item tree as Graphviz DOT
    pub fn item_dot(&mut self) -> String {
        to_dot(&self.item_tree())
    }
}
