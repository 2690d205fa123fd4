//! Search filtering — derive a filtered view of a forest from a term.
//!
//! Matching is name/description substring based (case-insensitive).  The
//! filtered forest preserves the ancestor chain of every match, and a matched
//! node keeps its entire subtree verbatim — the view should never hide the
//! contents of something the user just searched for.

use crate::tree::{Node, NodeId, Tree};

/// Result of [`search`]: the derived forest plus the number of nodes
/// (groups + leaves) it contains.
#[derive(Debug, Clone)]
pub struct SearchOutcome<R> {
    pub tree: Tree<R>,
    pub match_count: usize,
}

/// Filter `tree` down to nodes matching `term` and their ancestor chains.
///
/// An empty term returns the original forest unchanged with `match_count`
/// zero.  Otherwise, per node:
/// * a match (name or description contains the term, case-insensitively) is
///   included together with ALL of its original children, `expanded` forced
///   true;
/// * a non-match is included — children replaced by the filtered subset,
///   `expanded` forced true — only when at least one descendant survived;
///   otherwise it is dropped entirely.
///
/// The input tree is untouched; node ids in the outcome refer to the derived
/// tree, not the source.
pub fn search<R: Clone>(tree: &Tree<R>, term: &str) -> SearchOutcome<R> {
    if term.is_empty() {
        return SearchOutcome {
            tree: tree.clone(),
            match_count: 0,
        };
    }

    let needle = term.to_lowercase();
    let mut out = Tree::new();
    for &root in &tree.roots {
        filter_node(tree, root, &needle, None, &mut out);
    }

    let match_count = out.len();
    SearchOutcome {
        tree: out,
        match_count,
    }
}

fn node_matches<R>(node: &Node<R>, needle: &str) -> bool {
    node.name.to_lowercase().contains(needle)
        || node
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Copy the surviving part of `id`'s subtree into `out` under `parent`.
/// Returns whether anything survived.
fn filter_node<R: Clone>(
    src: &Tree<R>,
    id: NodeId,
    needle: &str,
    parent: Option<NodeId>,
    out: &mut Tree<R>,
) -> bool {
    let node = src.get(id);

    if node_matches(node, needle) {
        let copied = emit(out, parent, node, true);
        // Matched: carry the whole original subtree through unfiltered.
        for &child in &node.children {
            copy_subtree(src, child, copied, out);
        }
        return true;
    }

    // Not matched: keep only if some descendant matches.  The node must
    // exist in the arena before its children can attach to it, so emit
    // optimistically and roll back if nothing survives beneath it.
    let copied = emit(out, parent, node, true);
    let mut survived = false;
    for &child in &node.children {
        survived |= filter_node(src, child, needle, Some(copied), out);
    }

    if !survived {
        discard(out, parent, copied);
    }
    survived
}

/// Verbatim deep copy of a matched node's subtree (expansion state kept).
fn copy_subtree<R: Clone>(src: &Tree<R>, id: NodeId, parent: NodeId, out: &mut Tree<R>) {
    let node = src.get(id);
    let copied = emit(out, Some(parent), node, node.expanded);
    for &child in &node.children {
        copy_subtree(src, child, copied, out);
    }
}

fn emit<R: Clone>(out: &mut Tree<R>, parent: Option<NodeId>, node: &Node<R>, expanded: bool) -> NodeId {
    let fresh = Node {
        id: node.id.clone(),
        name: node.name.clone(),
        code: node.code.clone(),
        description: node.description.clone(),
        parent: None,
        children: Vec::new(),
        expanded,
        selected: node.selected,
        indeterminate: node.indeterminate,
        is_group: node.is_group,
        record: node.record.clone(),
        level: 0,
    };
    match parent {
        Some(p) => out.add_child(p, fresh),
        None => out.add_root(fresh),
    }
}

/// Remove an optimistically emitted node that turned out to have no
/// surviving descendants.  It is always the most recent entry whose subtree
/// is empty, so popping from the arena keeps ids dense.
fn discard<R>(out: &mut Tree<R>, parent: Option<NodeId>, id: NodeId) {
    debug_assert_eq!(id, out.nodes.len() - 1);
    debug_assert!(out.nodes[id].children.is_empty());
    out.nodes.pop();
    match parent {
        Some(p) => {
            out.nodes[p].children.pop();
        }
        None => {
            out.roots.pop();
        }
    }
}
