//! Editor tab bookkeeping.
//!
//! Tabs form a flat list keyed by generated id. At most one tab exists per
//! path: opening an already open path just activates its tab.

use crate::core::file_tree::is_ancestor;
use crate::models::EditorTab;

/// Open tabs plus the active selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabManager {
    tabs: Vec<EditorTab>,
    active: Option<String>,
}

impl TabManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts, dropping an active id with no tab.
    pub fn from_parts(tabs: Vec<EditorTab>, active: Option<String>) -> Self {
        let active = active.filter(|id| tabs.iter().any(|t| &t.id == id));
        Self { tabs, active }
    }

    pub fn tabs(&self) -> &[EditorTab] {
        &self.tabs
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&EditorTab> {
        let id = self.active.as_deref()?;
        self.get(id)
    }

    pub fn get(&self, id: &str) -> Option<&EditorTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn find_by_path(&self, path: &str) -> Option<&EditorTab> {
        self.tabs.iter().find(|t| t.path == path)
    }

    pub fn dirty_count(&self) -> usize {
        self.tabs.iter().filter(|t| t.is_dirty).count()
    }

    /// Activate the tab for `path`, creating it with `make_tab` if needed.
    ///
    /// Returns the id of the activated tab.
    pub fn open(&mut self, path: &str, make_tab: impl FnOnce() -> EditorTab) -> String {
        let id = match self.find_by_path(path) {
            Some(tab) => tab.id.clone(),
            None => {
                let tab = make_tab();
                let id = tab.id.clone();
                self.tabs.push(tab);
                id
            }
        };
        self.active = Some(id.clone());
        id
    }

    /// Activate an existing tab. Returns false for unknown ids.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.active = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Close a tab and return it.
    ///
    /// Closing the active tab activates the last remaining tab, or none.
    pub fn close(&mut self, id: &str) -> Option<EditorTab> {
        let index = self.tabs.iter().position(|t| t.id == id)?;
        let tab = self.tabs.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = self.tabs.last().map(|t| t.id.clone());
        }
        Some(tab)
    }

    /// Close every tab whose path is `path` or lies under it.
    pub fn close_under(&mut self, path: &str) -> Vec<EditorTab> {
        let ids: Vec<String> = self
            .tabs
            .iter()
            .filter(|t| t.path == path || is_ancestor(path, &t.path))
            .map(|t| t.id.clone())
            .collect();
        ids.iter().filter_map(|id| self.close(id)).collect()
    }

    /// Replace a tab's working copy and mark it dirty when it changed.
    pub fn edit(&mut self, id: &str, content: String) -> bool {
        match self.tabs.iter_mut().find(|t| t.id == id) {
            Some(tab) => {
                if tab.content != content {
                    tab.content = content;
                    tab.is_dirty = true;
                }
                true
            }
            None => false,
        }
    }

    /// Clear a tab's dirty flag, returning its path and content for syncing.
    pub fn mark_saved(&mut self, id: &str) -> Option<(String, String)> {
        let tab = self.tabs.iter_mut().find(|t| t.id == id)?;
        tab.is_dirty = false;
        Some((tab.path.clone(), tab.content.clone()))
    }

    /// Point tabs at `old_path` (or under it) to the renamed location.
    pub fn rebase_paths(&mut self, old_path: &str, new_path: &str) {
        for tab in &mut self.tabs {
            if tab.path == old_path {
                tab.path = new_path.to_string();
                tab.name = new_path.rsplit('/').next().unwrap_or(new_path).to_string();
            } else if is_ancestor(old_path, &tab.path) {
                tab.path = format!("{}{}", new_path, &tab.path[old_path.len()..]);
            }
        }
    }
}
