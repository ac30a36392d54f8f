//! Editor tab types.

use serde::{Deserialize, Serialize};

/// An open file handle in the editor.
///
/// `content` is the editor's working copy; it diverges from the backing
/// [`FileNode`](super::FileNode) until the tab is saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorTab {
    pub id: String,
    pub name: String,
    pub path: String,
    pub content: String,
    #[serde(default)]
    pub is_dirty: bool,
}

impl EditorTab {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            content: content.into(),
            is_dirty: false,
        }
    }

    /// Language label derived from the file name, for the status bar.
    pub fn language(&self) -> &'static str {
        match self.name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("cairo") => "Cairo",
            Some("toml") => "TOML",
            Some("md") => "Markdown",
            Some("json") => "JSON",
            _ => "Plain Text",
        }
    }
}

/// Sidebar panel currently shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivePanel {
    #[default]
    Files,
    Search,
    Deploy,
}

impl ActivePanel {
    pub fn title(self) -> &'static str {
        match self {
            Self::Files => "Explorer",
            Self::Search => "Search",
            Self::Deploy => "Deploy & Interact",
        }
    }
}
