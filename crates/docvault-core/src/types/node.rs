//! Folder tree nodes.
//!
//! A [`Node`] is a view object derived from the physical layout. Its `path`
//! is always its parent's path plus `/` plus its own name; nothing else
//! identifies it.

use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// Whether a node is a folder or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A directory.
    Folder,
    /// A regular file.
    File,
}

/// One folder or file in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Single path segment.
    pub name: String,
    /// Root-relative, slash-delimited logical path.
    pub path: String,
    /// Folder or file.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Logical path of the parent folder; `None` for root-level nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    /// Child nodes. Always `Some` for folders (possibly empty), `None` for files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    /// Stable identifier, when one is assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
}

impl Node {
    /// Create an empty folder node named `name` under `parent_path`.
    pub fn folder(name: impl Into<String>, parent_path: Option<&str>) -> Self {
        Self::new(name.into(), parent_path, NodeKind::Folder)
    }

    /// Create a file node named `name` under `parent_path`.
    pub fn file(name: impl Into<String>, parent_path: Option<&str>) -> Self {
        Self::new(name.into(), parent_path, NodeKind::File)
    }

    fn new(name: String, parent_path: Option<&str>, kind: NodeKind) -> Self {
        let parent_path = parent_path.filter(|p| !p.is_empty());
        Self {
            path: join_logical(parent_path, &name),
            name,
            kind,
            parent_path: parent_path.map(str::to_string),
            children: match kind {
                NodeKind::Folder => Some(Vec::new()),
                NodeKind::File => None,
            },
            id: None,
        }
    }

    /// Returns `true` for folders.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Returns `true` for root-level nodes.
    pub fn is_root(&self) -> bool {
        self.parent_path.is_none()
    }

    /// Child nodes; empty for files.
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Append a child. Files silently gain no children.
    pub fn push_child(&mut self, child: Node) {
        if let Some(children) = self.children.as_mut() {
            children.push(child);
        }
    }

    /// Depth-first, pre-order traversal of this node and all descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Visit every node of this subtree mutably, parents before children.
    pub fn visit_mut(&mut self, mut visit: impl FnMut(&mut Node)) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            visit(node);
            if let Some(children) = node.children.as_mut() {
                stack.extend(children.iter_mut().rev());
            }
        }
    }
}

/// Pre-order iterator over a subtree. See [`Node::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Iterate a forest of root nodes in pre-order.
pub fn walk_forest(roots: &[Node]) -> impl Iterator<Item = &Node> {
    roots.iter().flat_map(Node::descendants)
}

/// Find the node at `path` in a forest.
pub fn find_in_forest<'a>(roots: &'a [Node], path: &str) -> Option<&'a Node> {
    let mut segments = path.split('/');
    let first = segments.next()?;
    let mut current = roots.iter().find(|n| n.name == first)?;
    for segment in segments {
        current = current.children().iter().find(|n| n.name == segment)?;
    }
    Some(current)
}

/// Compose a logical path from an optional parent and a name.
pub fn join_logical(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}/{name}"),
        _ => name.to_string(),
    }
}
