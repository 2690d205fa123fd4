//! Hierarchical data engine for tree-view widgets and data grids.
//!
//! Four UI-independent pieces, leaves first:
//! * [`builder`] — build a forest of [`tree::Node`]s from flat records, by
//!   grouping key or by composite hierarchy codes.
//! * [`select`] — tri-state selection with upward aggregate propagation.
//! * [`search`] — derive a filtered forest from a term, preserving ancestor
//!   chains of matches.
//! * [`query`] — translate grid paging/sort/filter state into a query-string
//!   fragment for the external data service.
//!
//! Nothing here depends on any rendering crate; the view layer reads the
//! node model and calls back into these operations.  A [`tree::Tree`] is
//! single-owner and synchronous — callers serialize build/select/search
//! against one instance, and rebuilding invalidates held [`tree::NodeId`]s.

pub mod builder;
pub mod query;
pub mod search;
pub mod select;
pub mod tree;

pub use builder::{build_from_codes, build_grouped, HierarchyWarning, Record};
pub use query::{
    build_query_string, FilterEntry, FilterKind, GridState, QueryError, Sort, SortDirection,
};
pub use search::{search, SearchOutcome};
pub use select::{deselect_all, select_all, selected_leaves, set_selected};
pub use tree::{Node, NodeId, Tree};
