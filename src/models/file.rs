//! File tree node types.

use serde::{Deserialize, Serialize};

/// Whether a node is a file or a folder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A single entry of the in-memory project tree.
///
/// Folders own their children, so the tree cannot contain cycles. The `path`
/// of a node is always its parent's path joined with its `name`; top-level
/// nodes live directly under `/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// Create a file node under `parent_path` (`None` for the root).
    pub fn file(
        id: impl Into<String>,
        parent_path: Option<&str>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            path: join_path(parent_path, &name),
            name,
            kind: NodeKind::File,
            content: Some(content.into()),
            children: Vec::new(),
        }
    }

    /// Create an empty folder node under `parent_path` (`None` for the root).
    pub fn folder(id: impl Into<String>, parent_path: Option<&str>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            path: join_path(parent_path, &name),
            name,
            kind: NodeKind::Folder,
            content: None,
            children: Vec::new(),
        }
    }

    /// Builder-style child attachment, used for templates.
    pub fn with_child(mut self, child: FileNode) -> Self {
        self.children.push(child);
        self
    }

    #[inline]
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// File extension without the dot, lowercased.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty())
            .map(|(_, ext)| ext.to_lowercase())
    }

    /// Recompute this node's path (and all descendants') below `parent_path`.
    pub fn reparent(&mut self, parent_path: Option<&str>) {
        self.path = join_path(parent_path, &self.name);
        let path = self.path.clone();
        for child in &mut self.children {
            child.reparent(Some(&path));
        }
    }
}

/// Join a parent path and a child name. `None` means the tree root.
pub fn join_path(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) if !parent.is_empty() && parent != "/" => {
            format!("{}/{}", parent.trim_end_matches('/'), name)
        }
        _ => format!("/{}", name),
    }
}

/// Parent path of `path`, or `None` for top-level nodes.
pub fn parent_path(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => None,
        Some(idx) => Some(&trimmed[..idx]),
    }
}
