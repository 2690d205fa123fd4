//! Tree construction — turn flat records into a [`Tree`].
//!
//! Two modes are supported:
//! * **grouped** — records share a grouping key; a synthetic group node is
//!   created per distinct key and leaves are appended beneath it.
//! * **hierarchy from codes** — records carry a composite code string
//!   (`"1-2-3"`) and the parent/child structure is inferred from code
//!   prefixes.
//!
//! Nothing in this module depends on any UI or rendering crate.

use std::collections::HashMap;

use crate::select;
use crate::tree::{Node, NodeId, Tree};

// ───────────────────────────────────────── record seam ───────

/// Field accessors for a source record.
///
/// Implemented by the caller's row type; the builder never interprets the
/// record beyond these accessors and stores it back on the leaf untouched.
pub trait Record {
    /// Stable identifier of the record.
    fn id(&self) -> String;
    /// Grouping key (grouped mode) or composite hierarchy code (code mode).
    fn code(&self) -> String;
    /// Display name.
    fn name(&self) -> String;
    fn description(&self) -> Option<String> {
        None
    }
    /// Whether the record starts out selected.
    fn preselected(&self) -> bool {
        false
    }
}

fn leaf_node<R: Record>(record: R) -> Node<R> {
    Node {
        id: record.id(),
        name: record.name(),
        code: record.code(),
        description: record.description(),
        parent: None,
        children: Vec::new(),
        expanded: false,
        selected: record.preselected(),
        indeterminate: false,
        is_group: false,
        record: Some(record),
        level: 0,
    }
}

// ───────────────────────────────────────── grouped mode ──────

/// Build a forest of group nodes from flat records sharing a grouping key.
///
/// Groups appear in first-seen order; leaves keep input order within their
/// group.  Key comparison is exact string equality, so records with an empty
/// code form their own `""` group — that is a valid singleton group, not an
/// error.  Each group's tri-state aggregate is recomputed as its leaves are
/// appended, so preselected records are reflected immediately.
pub fn build_grouped<R, I>(records: I) -> Tree<R>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let mut tree = Tree::new();
    let mut groups: HashMap<String, NodeId> = HashMap::new();

    for record in records {
        let code = record.code();
        let group_id = match groups.get(&code) {
            Some(&id) => id,
            None => {
                let id = tree.add_root(Node {
                    id: String::new(),
                    name: code.clone(),
                    code: code.clone(),
                    description: None,
                    parent: None,
                    children: Vec::new(),
                    expanded: true,
                    selected: false,
                    indeterminate: false,
                    is_group: true,
                    record: None,
                    level: 0,
                });
                groups.insert(code, id);
                id
            }
        };

        tree.add_child(group_id, leaf_node(record));
        // Preselected leaves fold into the group's aggregate as they land.
        select::refresh_aggregate(&mut tree, group_id);
    }

    tracing::debug!(
        groups = tree.roots.len(),
        nodes = tree.len(),
        "built grouped tree"
    );
    tree
}

// ───────────────────────────────────────── code mode ─────────

/// Recoverable degradation during [`build_from_codes`]: an item's computed
/// parent code was not among already-processed items, so the item was placed
/// at the root instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyWarning {
    /// Code of the item that was demoted to a root.
    pub code: String,
    /// The parent code that could not be found.
    pub missing_parent: String,
}

/// Build a hierarchy by inferring parent codes from composite code strings.
///
/// For each item, in input order: if its code contains `separator`, the
/// parent code is the prefix before the *last* occurrence; otherwise, if the
/// code is longer than one character, the parent code is the code minus its
/// final character; otherwise the item is a root.  Ancestors must be observed
/// before descendants to be found — an unresolved parent demotes the item to
/// a root (level 0) and is reported as a [`HierarchyWarning`], never an
/// error.
pub fn build_from_codes<R, I>(records: I, separator: char) -> (Tree<R>, Vec<HierarchyWarning>)
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let mut tree = Tree::new();
    let mut by_code: HashMap<String, NodeId> = HashMap::new();
    let mut warnings = Vec::new();

    for record in records {
        let code = record.code();
        let parent_code = match code.rfind(separator) {
            Some(pos) => Some(code[..pos].to_string()),
            None if code.chars().count() > 1 => {
                let mut chars = code.chars();
                chars.next_back();
                Some(chars.as_str().to_string())
            }
            None => None,
        };

        let mut node = leaf_node(record);
        node.expanded = true;

        let id = match parent_code {
            Some(ref pc) => match by_code.get(pc) {
                Some(&parent_id) => tree.add_child(parent_id, node),
                None => {
                    tracing::warn!(code = %code, parent = %pc, "parent code not found; placing item at root");
                    warnings.push(HierarchyWarning {
                        code: code.clone(),
                        missing_parent: pc.clone(),
                    });
                    tree.add_root(node)
                }
            },
            None => tree.add_root(node),
        };
        by_code.insert(code, id);
    }

    tracing::debug!(
        roots = tree.roots.len(),
        nodes = tree.len(),
        orphans = warnings.len(),
        "built tree from codes"
    );
    (tree, warnings)
}
