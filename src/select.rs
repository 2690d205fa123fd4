//! Tri-state selection — toggle subtrees and propagate aggregates upward.
//!
//! A toggled subtree adopts one uniform state; ancestors are then recomputed
//! from their direct children only, nearest first, because a grandparent's
//! aggregate depends on the parent's just-updated state rather than on raw
//! leaf counts.  The stored parent index on every node makes the upward walk
//! O(depth) — no structural search over the arena is needed.

use crate::tree::{NodeId, Tree};

/// Set `selected` on a node and its whole subtree, then propagate the
/// aggregate to every ancestor.  Returns the updated flat list of selected
/// leaf (non-group) nodes in pre-order.
pub fn set_selected<R>(tree: &mut Tree<R>, id: NodeId, is_selected: bool) -> Vec<NodeId> {
    apply_subtree(tree, id, is_selected);

    let mut cursor = tree.nodes[id].parent;
    while let Some(ancestor) = cursor {
        refresh_aggregate(tree, ancestor);
        cursor = tree.nodes[ancestor].parent;
    }

    selected_leaves(tree)
}

/// Select every node of the given (possibly filtered) forest.
pub fn select_all<R>(tree: &mut Tree<R>) -> Vec<NodeId> {
    set_all(tree, true)
}

/// Clear the selection of the given (possibly filtered) forest.
pub fn deselect_all<R>(tree: &mut Tree<R>) -> Vec<NodeId> {
    set_all(tree, false)
}

fn set_all<R>(tree: &mut Tree<R>, is_selected: bool) -> Vec<NodeId> {
    let roots = tree.roots.clone();
    for root in roots {
        apply_subtree(tree, root, is_selected);
    }
    selected_leaves(tree)
}

/// Recompute a node's tri-state aggregate from its direct children only:
/// none selected → unselected, all selected → selected, otherwise
/// indeterminate.  `selected` and `indeterminate` are never both true.
///
/// A node with no children has no derived aggregate — its flags are owned
/// by the toggle and are left untouched.
pub fn refresh_aggregate<R>(tree: &mut Tree<R>, id: NodeId) {
    if tree.nodes[id].children.is_empty() {
        return;
    }
    let total = tree.nodes[id].children.len();
    let selected_count = tree.nodes[id]
        .children
        .iter()
        .filter(|&&child| tree.nodes[child].selected)
        .count();

    let node = &mut tree.nodes[id];
    if selected_count == 0 {
        node.selected = false;
        node.indeterminate = false;
    } else if selected_count == total {
        node.selected = true;
        node.indeterminate = false;
    } else {
        node.selected = false;
        node.indeterminate = true;
    }
}

/// The flat selection result: selected non-group nodes in pre-order.
pub fn selected_leaves<R>(tree: &Tree<R>) -> Vec<NodeId> {
    tree.pre_order()
        .into_iter()
        .filter(|&id| {
            let node = &tree.nodes[id];
            !node.is_group && node.selected
        })
        .collect()
}

fn apply_subtree<R>(tree: &mut Tree<R>, id: NodeId, is_selected: bool) {
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        let node = &mut tree.nodes[current];
        node.selected = is_selected;
        node.indeterminate = false;
        stack.extend(node.children.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_grouped, Record};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Row {
        id: String,
        code: String,
        name: String,
    }

    impl Record for Row {
        fn id(&self) -> String {
            self.id.clone()
        }
        fn code(&self) -> String {
            self.code.clone()
        }
        fn name(&self) -> String {
            self.name.clone()
        }
    }

    fn row(id: &str, code: &str, name: &str) -> Row {
        Row {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    fn sample_tree() -> Tree<Row> {
        build_grouped(vec![
            row("1", "fin", "Invoice"),
            row("2", "fin", "Payroll"),
            row("3", "hr", "Hiring"),
        ])
    }

    #[test]
    fn selecting_one_leaf_marks_group_indeterminate() {
        let mut tree = sample_tree();
        let fin = tree.roots[0];
        let invoice = tree.get(fin).children[0];

        let selected = set_selected(&mut tree, invoice, true);
        assert_eq!(selected, vec![invoice]);
        assert!(!tree.get(fin).selected);
        assert!(tree.get(fin).indeterminate);
    }

    #[test]
    fn selecting_all_leaves_marks_group_selected() {
        let mut tree = sample_tree();
        let fin = tree.roots[0];
        let children = tree.get(fin).children.clone();

        for child in &children {
            set_selected(&mut tree, *child, true);
        }
        assert!(tree.get(fin).selected);
        assert!(!tree.get(fin).indeterminate);
    }

    #[test]
    fn toggling_a_group_cascades_to_leaves() {
        let mut tree = sample_tree();
        let fin = tree.roots[0];

        let selected = set_selected(&mut tree, fin, true);
        // Only leaves are reported, in pre-order.
        assert_eq!(selected, tree.get(fin).children.clone());

        set_selected(&mut tree, fin, false);
        for id in tree.pre_order() {
            assert!(!tree.get(id).selected);
            assert!(!tree.get(id).indeterminate);
        }
    }

    #[test]
    fn select_all_then_deselect_all_clears_every_flag() {
        let mut tree = sample_tree();

        let selected = select_all(&mut tree);
        assert_eq!(selected.len(), 3);
        for id in tree.pre_order() {
            let node = tree.get(id);
            assert!(node.is_group || node.selected);
            assert!(!node.indeterminate);
        }

        let selected = deselect_all(&mut tree);
        assert!(selected.is_empty());
        for id in tree.pre_order() {
            assert!(!tree.get(id).selected);
            assert!(!tree.get(id).indeterminate);
        }
    }

    #[test]
    fn propagation_recomputes_nearest_ancestor_first() {
        // grandparent "1" → parent "11" (two leaves) + leaf "12".
        let (mut tree, _) = crate::builder::build_from_codes(
            vec![
                row("g", "1", "G"),
                row("p", "11", "P"),
                row("a", "111", "A"),
                row("b", "112", "B"),
                row("c", "12", "C"),
            ],
            '-',
        );
        let grandparent = tree.roots[0];
        let parent = tree.get(grandparent).children[0];
        let leaf_a = tree.get(parent).children[0];
        let leaf_b = tree.get(parent).children[1];

        set_selected(&mut tree, leaf_a, true);
        // Parent is indeterminate, so it counts as unselected at the
        // grandparent: zero selected direct children means no aggregate.
        assert!(tree.get(parent).indeterminate);
        assert!(!tree.get(grandparent).selected);
        assert!(!tree.get(grandparent).indeterminate);

        set_selected(&mut tree, leaf_b, true);
        // The parent flips to selected first; the grandparent must read
        // that just-updated state (1 of 2 direct children selected), not
        // re-derive from leaf counts.
        assert!(tree.get(parent).selected);
        assert!(!tree.get(grandparent).selected);
        assert!(tree.get(grandparent).indeterminate);
    }

    #[test]
    fn refresh_aggregate_leaves_childless_nodes_alone() {
        let mut tree = sample_tree();
        let fin = tree.roots[0];
        let invoice = tree.get(fin).children[0];
        set_selected(&mut tree, invoice, true);

        refresh_aggregate(&mut tree, invoice);
        // A leaf has no derived aggregate; its toggle state must survive.
        assert!(tree.get(invoice).selected);
        assert!(!tree.get(invoice).indeterminate);
    }

    #[test]
    fn propagation_is_idempotent() {
        let mut tree = sample_tree();
        let fin = tree.roots[0];
        let invoice = tree.get(fin).children[0];
        set_selected(&mut tree, invoice, true);

        let before: Vec<(bool, bool)> = tree
            .pre_order()
            .into_iter()
            .map(|id| (tree.get(id).selected, tree.get(id).indeterminate))
            .collect();

        for id in tree.pre_order() {
            refresh_aggregate(&mut tree, id);
        }

        let after: Vec<(bool, bool)> = tree
            .pre_order()
            .into_iter()
            .map(|id| (tree.get(id).selected, tree.get(id).indeterminate))
            .collect();
        assert_eq!(before, after);
    }

    proptest! {
        /// For a group with k of n children selected:
        /// indeterminate == (0 < k < n) and selected == (k == n).
        #[test]
        fn aggregate_matches_subset_size(flags in prop::collection::vec(any::<bool>(), 1..12)) {
            let records: Vec<Row> = flags
                .iter()
                .enumerate()
                .map(|(i, _)| row(&i.to_string(), "grp", &format!("leaf {i}")))
                .collect();
            let mut tree = build_grouped(records);
            let group = tree.roots[0];
            let children = tree.get(group).children.clone();

            for (child, &on) in children.iter().zip(&flags) {
                set_selected(&mut tree, *child, on);
            }

            let k = flags.iter().filter(|&&on| on).count();
            let n = flags.len();
            let g = tree.get(group);
            prop_assert_eq!(g.selected, k == n);
            prop_assert_eq!(g.indeterminate, k > 0 && k < n);
            prop_assert!(!(g.selected && g.indeterminate));
        }
    }
}
