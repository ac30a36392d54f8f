//! Persisted workspace snapshot.
//!
//! One JSON object under [`STORAGE_KEY`](crate::config::STORAGE_KEY). It holds no
//! version field; anything that fails to parse is discarded wholesale.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::layout::{SIDEBAR_DEFAULT_WIDTH, SIDEBAR_MAX_WIDTH, SIDEBAR_MIN_WIDTH};
use crate::core::error::StorageError;
use crate::core::file_tree::default_tree;
use crate::core::tabs::TabManager;
use crate::core::workspace::Workspace;
use crate::models::{ActivePanel, EditorTab, FileNode};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub files: Vec<FileNode>,
    pub tabs: Vec<EditorTab>,
    pub active_tab: Option<String>,
    #[serde(default)]
    pub active_panel: ActivePanel,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u32,
}

fn default_sidebar_width() -> u32 {
    SIDEBAR_DEFAULT_WIDTH
}

/// Keep a sidebar width inside the allowed range.
pub fn clamp_sidebar_width(width: u32) -> u32 {
    width.clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH)
}

impl Snapshot {
    /// First-launch state: template project, no tabs.
    pub fn initial<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            files: default_tree(rng),
            tabs: Vec::new(),
            active_tab: None,
            active_panel: ActivePanel::Files,
            sidebar_width: SIDEBAR_DEFAULT_WIDTH,
        }
    }

    pub fn capture(workspace: &Workspace, active_panel: ActivePanel, sidebar_width: u32) -> Self {
        Self {
            files: workspace.files.clone(),
            tabs: workspace.tabs.tabs().to_vec(),
            active_tab: workspace.tabs.active_id().map(str::to_string),
            active_panel,
            sidebar_width,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let mut snapshot: Self =
            serde_json::from_str(json).map_err(|e| StorageError::Malformed(e.to_string()))?;
        snapshot.sidebar_width = clamp_sidebar_width(snapshot.sidebar_width);
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::SerializationFailed(e.to_string()))
    }

    /// Split into the workspace and the layout fields.
    pub fn into_parts(self) -> (Workspace, ActivePanel, u32) {
        let tabs = TabManager::from_parts(self.tabs, self.active_tab);
        (
            Workspace::new(self.files, tabs),
            self.active_panel,
            clamp_sidebar_width(self.sidebar_width),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_json_shape() {
        let snapshot = Snapshot::initial(&mut StdRng::seed_from_u64(1));
        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["activePanel", "activeTab", "files", "sidebarWidth", "tabs"]);
        assert_eq!(obj["activePanel"], "files");
        assert!(obj["activeTab"].is_null());
        assert_eq!(obj["files"][0]["type"], "folder");
    }

    #[test]
    fn test_round_trip_with_tabs() {
        let mut rng = StdRng::seed_from_u64(2);
        let (mut ws, _, _) = Snapshot::initial(&mut rng).into_parts();
        let id = ws.open_file(&mut rng, "/src/lib.cairo").unwrap();
        ws.edit(&id, "draft".to_string());

        let json = Snapshot::capture(&ws, ActivePanel::Deploy, 320).to_json().unwrap();
        let (restored, panel, width) = Snapshot::from_json(&json).unwrap().into_parts();
        assert_eq!(restored, ws);
        assert_eq!(panel, ActivePanel::Deploy);
        assert_eq!(width, 320);
        assert!(restored.tabs.active().unwrap().is_dirty);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Snapshot::from_json("{"), Err(StorageError::Malformed(_))));
        assert!(matches!(
            Snapshot::from_json(r#"{"files": 3}"#),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_layout_fields_default() {
        let snapshot = Snapshot::from_json(r#"{"files": [], "tabs": [], "activeTab": null}"#).unwrap();
        assert_eq!(snapshot.active_panel, ActivePanel::Files);
        assert_eq!(snapshot.sidebar_width, SIDEBAR_DEFAULT_WIDTH);
    }

    #[test]
    fn test_sidebar_width_clamped() {
        let json = r#"{"files": [], "tabs": [], "activeTab": "gone", "sidebarWidth": 5000}"#;
        let (ws, _, width) = Snapshot::from_json(json).unwrap().into_parts();
        assert_eq!(width, SIDEBAR_MAX_WIDTH);
        assert!(ws.tabs.active_id().is_none());
    }
}
