//! Human-readable dumps of an expression graph.

use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::{
    address::Address,
    error::Result,
    expr::Expr,
    graph::Graph,
    node::Node,
};

/// Dumps everything reachable from `root` as an indented tree.
///
/// Shared nodes are printed once per edge, like [`Graph::accept`] visits
/// them; repeat sightings are marked with `*`.
///
/// Output format:
/// ```text
/// === Graph Dump (root: #0004) ===
/// Total nodes: 5
///
/// 0004 add<float32>
///   0003 mul<float32>
///     0000 index<int32> [0] "x"
///     0000 index<int32> [0] "x" *
///   0002 index<int32> [1]
/// ```
pub fn dump_graph<A: Address>(graph: &Graph<A>, root: Expr) -> Result<String> {
    let root_node = graph.node(root)?;
    let mut lines = vec![
        format!("=== Graph Dump (root: #{:04}) ===", root_node.id()),
        format!("Total nodes: {}", graph.len()),
        String::new(),
    ];
    let mut seen = FxHashSet::default();

    let mut stack = vec![(root, 0usize)];
    while let Some((expr, depth)) = stack.pop() {
        let node = graph.node(expr)?;
        lines.push(format_node(node, depth, !seen.insert(expr)));

        stack.extend(node.children().rev().map(|child| (child, depth + 1)));
    }

    Ok(finish(lines))
}

/// Dumps every node in allocation order, children referenced by id.
pub fn dump_graph_sequential<A: Address>(graph: &Graph<A>) -> String {
    let mut lines = vec![
        "=== Graph Sequential Dump ===".to_string(),
        format!("Total nodes: {}", graph.len()),
        String::new(),
    ];

    lines.extend(graph.iter().map(|(_, node)| format_entry(graph, node)));

    finish(lines)
}

fn format_node<A: Address>(node: &Node<A>, depth: usize, repeated: bool) -> String {
    let mut line = format!("{}{:04} {}", "  ".repeat(depth), node.id(), node);

    if let Ok(address) = node.address() {
        line.push_str(&format!(" @ {:?}", address));
    }

    if repeated {
        line.push_str(" *");
    }

    line
}

fn format_entry<A: Address>(graph: &Graph<A>, node: &Node<A>) -> String {
    let mut line = format!("{:04} {}", node.id(), node);

    if node.arity() > 0 {
        let children = node.children().map(|child| format_ref(graph, child)).join(", ");
        line.push_str(&format!(" ({})", children));
    }

    if node.group_size() > 0 {
        let members = node.members().iter().map(|member| format_ref(graph, *member)).join(", ");
        line.push_str(&format!(" members=[{}] x{}", members, node.num_groups()));
    }

    line
}

fn format_ref<A: Address>(graph: &Graph<A>, expr: Expr) -> String {
    graph
        .node(expr)
        .map(|node| format!("#{:04}", node.id()))
        .unwrap_or_else(|_| "#????".to_string())
}

fn finish(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}
