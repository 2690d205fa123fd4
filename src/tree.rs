//! In-memory forest data-structure backing the tree-view model.
//!
//! The [`Node`] is the fundamental unit – it holds the display fields for a
//! single entry (group or leaf) and links to its children via indices into an
//! arena (the [`Tree`] struct).  Using an arena avoids recursive `Box`
//! allocations, is cache-friendly, and gives every node a stable address
//! (`NodeId`) for the lifetime of one tree instance.  Rebuilding the tree
//! invalidates previously held ids.

// ───────────────────────────────────────── tree node ─────────

/// Index into [`Tree::nodes`].
pub type NodeId = usize;

/// A single node in the arena-allocated forest.
///
/// `R` is the caller's source-record type; leaves keep an opaque back
/// reference to the record they were built from, synthetic group nodes
/// carry `None`.
#[derive(Debug, Clone)]
pub struct Node<R> {
    /// Identifier carried over from the source record (empty for groups).
    pub id: String,
    pub name: String,
    /// Grouping key (Mode A) or composite hierarchy code (Mode B).
    pub code: String,
    pub description: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Whether this node is expanded in the view.
    pub expanded: bool,
    pub selected: bool,
    /// Partial-selection aggregate; never true together with `selected`.
    pub indeterminate: bool,
    /// Marks a synthetic aggregator created by the grouping builder.
    pub is_group: bool,
    /// Read-only back-reference to the source record.
    pub record: Option<R>,
    /// Depth from the root (0 = root).
    pub level: usize,
}

// ───────────────────────────────────────── arena forest ──────

/// Arena-backed forest: an ordered sequence of root nodes.
///
/// Nodes are stored in a flat `Vec` and reference each other by index, which
/// avoids recursive ownership and makes upward propagation O(depth) via the
/// stored parent index instead of a structural search.
#[derive(Debug, Clone, Default)]
pub struct Tree<R> {
    pub nodes: Vec<Node<R>>,
    pub roots: Vec<NodeId>,
}

impl<R> Tree<R> {
    /// Create an empty forest.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Insert `node` as a new root and return its [`NodeId`].
    pub fn add_root(&mut self, mut node: Node<R>) -> NodeId {
        let id = self.nodes.len();
        node.parent = None;
        node.level = 0;
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    /// Insert `node` under `parent_id` and return its [`NodeId`].
    ///
    /// The parent link and level are derived here so they stay consistent
    /// with the arena by construction.
    pub fn add_child(&mut self, parent_id: NodeId, mut node: Node<R>) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent_id);
        node.level = self.nodes[parent_id].level + 1;
        self.nodes.push(node);
        self.nodes[parent_id].children.push(id);
        id
    }

    /// Return a reference to a node.
    pub fn get(&self, id: NodeId) -> &Node<R> {
        &self.nodes[id]
    }

    /// Return a mutable reference to a node.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<R> {
        &mut self.nodes[id]
    }

    /// Total number of nodes (groups + leaves) in the forest.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in pre-order (roots in insertion order, each followed by
    /// its subtree).  This is the flattened sequence the view renders and
    /// the order selection results are reported in.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.collect_pre_order(root, &mut out);
        }
        out
    }

    fn collect_pre_order(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &child in &self.nodes[id].children {
            self.collect_pre_order(child, out);
        }
    }

    /// Node ids currently visible given expansion state (collapsed subtrees
    /// are skipped).
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.roots {
            self.collect_visible(root, &mut out);
        }
        out
    }

    fn collect_visible(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if self.nodes[id].expanded {
            for &child in &self.nodes[id].children {
                self.collect_visible(child, out);
            }
        }
    }

    /// Toggle the expanded state of a node.
    pub fn toggle_expand(&mut self, id: NodeId) {
        self.nodes[id].expanded = !self.nodes[id].expanded;
    }
}
