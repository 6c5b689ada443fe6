//! Hierarchy documents: the nested node structure.

use crate::{chunk::IdTable, value::Value};

/// A node of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocNode {
    /// Id referencing the chunk table.
    pub id: String,
    /// Entry title, empty when the id is unknown.
    pub title: String,
    /// Target path from the chunk table, empty when the id is unknown.
    pub target_path: String,
    /// Child nodes in sibling order.
    pub children: Vec<Self>,
}

impl TocNode {
    /// Creates a leaf node.
    pub fn new(id: impl Into<String>, title: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target_path: target.into(),
            children: Vec::new(),
        }
    }

    /// Adds children to this node.
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }
}

/// Builds the node tree of a parsed hierarchy document.
///
/// The document is `{tree: {n: [node, ...]}}` with `node = {i: id, c: chunk, n: [...]}`. Titles
/// and target paths are resolved through `table`.
pub fn build_tree(hierarchy: &Value, table: &IdTable) -> Result<Vec<TocNode>, &'static str> {
    let tree = hierarchy
        .get("tree")
        .ok_or("hierarchy document has no 'tree' entry")?;
    if tree.entries().is_none() {
        return Err("hierarchy 'tree' entry is not an object");
    }
    Ok(build_nodes(tree.get("n").map(Value::items).unwrap_or_default(), table))
}

/// Converts a list of raw nodes.
fn build_nodes(raw: &[Value], table: &IdTable) -> Vec<TocNode> {
    raw.iter()
        .filter(|node| node.entries().is_some())
        .map(|node| {
            let id = node.get("i").and_then(Value::as_id).unwrap_or_default();
            let (title, target_path) = table
                .get(&id)
                .map(|info| (info.title.clone(), info.path.clone()))
                .unwrap_or_default();
            let children = build_nodes(node.get("n").map(Value::items).unwrap_or_default(), table);
            TocNode {
                id,
                title,
                target_path,
                children,
            }
        })
        .collect()
}
