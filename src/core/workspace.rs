//! File tree and editor tab mediation.
//!
//! [`Workspace`] owns both halves so that operations touching the two
//! (opening, saving, deleting, renaming) keep them consistent.

use rand::Rng;
use serde::Deserialize;

use crate::core::error::FileTreeError;
use crate::core::file_tree;
use crate::core::random::new_id;
use crate::core::tabs::TabManager;
use crate::models::{EditorTab, FileNode};

/// Project files plus the editor tabs referencing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Workspace {
    pub files: Vec<FileNode>,
    pub tabs: TabManager,
}

#[derive(Deserialize)]
struct ScarbManifest {
    package: ScarbPackage,
}

#[derive(Deserialize)]
struct ScarbPackage {
    name: String,
}

impl Workspace {
    pub fn new(files: Vec<FileNode>, tabs: TabManager) -> Self {
        Self { files, tabs }
    }

    /// Open the file at `path` in a tab (or focus its existing tab).
    pub fn open_file<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        path: &str,
    ) -> Result<String, FileTreeError> {
        let node = file_tree::find(&self.files, path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        if !node.is_file() {
            return Err(FileTreeError::NotAFile(path.to_string()));
        }
        let (name, content) = (node.name.clone(), node.content.clone().unwrap_or_default());
        Ok(self
            .tabs
            .open(path, || EditorTab::new(new_id(rng), name, path, content)))
    }

    /// Update the working copy of a tab.
    pub fn edit(&mut self, tab_id: &str, content: String) -> bool {
        self.tabs.edit(tab_id, content)
    }

    /// Write a tab's working copy back into its file and clear the dirty flag.
    pub fn save(&mut self, tab_id: &str) -> Result<(), FileTreeError> {
        let Some((path, content)) = self.tabs.mark_saved(tab_id) else {
            return Ok(());
        };
        file_tree::update_content(&mut self.files, &path, content)
    }

    /// Save every dirty tab, returning how many were written.
    pub fn save_all(&mut self) -> Result<usize, FileTreeError> {
        let dirty: Vec<String> = self
            .tabs
            .tabs()
            .iter()
            .filter(|t| t.is_dirty)
            .map(|t| t.id.clone())
            .collect();
        for id in &dirty {
            self.save(id)?;
        }
        Ok(dirty.len())
    }

    /// Create an empty file under `parent` and open it.
    pub fn create_file<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        parent: Option<&str>,
        name: &str,
    ) -> Result<String, FileTreeError> {
        let node = FileNode::file(new_id(rng), parent, name, "");
        let path = file_tree::insert(&mut self.files, parent, node)?;
        self.open_file(rng, &path)?;
        Ok(path)
    }

    /// Create an empty folder under `parent`.
    pub fn create_folder<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        parent: Option<&str>,
        name: &str,
    ) -> Result<String, FileTreeError> {
        let node = FileNode::folder(new_id(rng), parent, name);
        file_tree::insert(&mut self.files, parent, node)
    }

    /// Delete the node at `path`, closing any tabs at or below it.
    pub fn delete(&mut self, path: &str) -> Result<FileNode, FileTreeError> {
        let removed = file_tree::remove(&mut self.files, path)?;
        self.tabs.close_under(path);
        Ok(removed)
    }

    /// Rename the node at `path`, keeping open tabs pointed at it.
    pub fn rename(&mut self, path: &str, new_name: &str) -> Result<String, FileTreeError> {
        let new_path = file_tree::rename(&mut self.files, path, new_name)?;
        self.tabs.rebase_paths(path, &new_path);
        Ok(new_path)
    }

    /// Swap in an imported project: every tab closes and the first Cairo
    /// file, if any, is opened. Returns the opened path.
    pub fn replace_project<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        files: Vec<FileNode>,
    ) -> Option<String> {
        self.files = files;
        self.tabs = TabManager::new();
        let path = file_tree::first_cairo_file(&self.files)?.path.clone();
        self.open_file(rng, &path).ok()?;
        Some(path)
    }

    /// Content of a file, preferring the unsaved working copy of its tab.
    pub fn current_content(&self, path: &str) -> Option<String> {
        if let Some(tab) = self.tabs.find_by_path(path) {
            return Some(tab.content.clone());
        }
        file_tree::find(&self.files, path).and_then(|n| n.content.clone())
    }

    /// Package name from the top-level `Scarb.toml`, if it parses.
    pub fn package_name(&self) -> Option<String> {
        let manifest = file_tree::find(&self.files, "/Scarb.toml")?.content.as_deref()?;
        toml::from_str::<ScarbManifest>(manifest)
            .ok()
            .map(|m| m.package.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn workspace() -> (Workspace, StdRng) {
        let mut rng = StdRng::seed_from_u64(3);
        let files = file_tree::default_tree(&mut rng);
        (Workspace::new(files, TabManager::new()), rng)
    }

    #[test]
    fn test_open_file_once_per_path() {
        let (mut ws, mut rng) = workspace();
        let first = ws.open_file(&mut rng, "/src/lib.cairo").unwrap();
        let second = ws.open_file(&mut rng, "/src/lib.cairo").unwrap();
        assert_eq!(first, second);
        assert_eq!(ws.tabs.tabs().len(), 1);
        assert!(ws.open_file(&mut rng, "/src").is_err());
    }

    #[test]
    fn test_save_syncs_file_tree() {
        let (mut ws, mut rng) = workspace();
        let id = ws.open_file(&mut rng, "/README.md").unwrap();
        ws.edit(&id, "# changed".to_string());

        let node = file_tree::find(&ws.files, "/README.md").unwrap();
        assert_ne!(node.content.as_deref(), Some("# changed"));
        assert_eq!(ws.current_content("/README.md").as_deref(), Some("# changed"));

        ws.save(&id).unwrap();
        let node = file_tree::find(&ws.files, "/README.md").unwrap();
        assert_eq!(node.content.as_deref(), Some("# changed"));
        assert!(!ws.tabs.get(&id).unwrap().is_dirty);
    }

    #[test]
    fn test_save_all() {
        let (mut ws, mut rng) = workspace();
        let a = ws.open_file(&mut rng, "/README.md").unwrap();
        let b = ws.open_file(&mut rng, "/Scarb.toml").unwrap();
        ws.edit(&a, "a".to_string());
        ws.edit(&b, "b".to_string());
        assert_eq!(ws.save_all().unwrap(), 2);
        assert_eq!(ws.tabs.dirty_count(), 0);
    }

    #[test]
    fn test_create_file_opens_tab() {
        let (mut ws, mut rng) = workspace();
        let path = ws.create_file(&mut rng, Some("/src"), "erc20.cairo").unwrap();
        assert_eq!(ws.tabs.active().unwrap().path, path);
    }

    #[test]
    fn test_delete_folder_closes_tabs() {
        let (mut ws, mut rng) = workspace();
        ws.open_file(&mut rng, "/src/lib.cairo").unwrap();
        ws.open_file(&mut rng, "/README.md").unwrap();
        ws.delete("/src").unwrap();
        assert_eq!(ws.tabs.tabs().len(), 1);
        assert_eq!(ws.tabs.active().unwrap().path, "/README.md");
    }

    #[test]
    fn test_rename_moves_tabs() {
        let (mut ws, mut rng) = workspace();
        let id = ws.open_file(&mut rng, "/src/lib.cairo").unwrap();
        ws.rename("/src", "contracts").unwrap();
        assert_eq!(ws.tabs.get(&id).unwrap().path, "/contracts/lib.cairo");
        ws.save(&id).unwrap();
    }

    #[test]
    fn test_replace_project_resets_tabs_and_opens_cairo() {
        let (mut ws, mut rng) = workspace();
        let readme = ws.open_file(&mut rng, "/README.md").unwrap();
        ws.edit(&readme, "unsaved".to_string());

        let imported = vec![
            FileNode::folder("d", None, "docs")
                .with_child(FileNode::file("n", Some("/docs"), "notes.md", "")),
            FileNode::folder("s", None, "src")
                .with_child(FileNode::file("v", Some("/src"), "vault.cairo", "mod vault {}")),
        ];
        let opened = ws.replace_project(&mut rng, imported);

        assert_eq!(opened.as_deref(), Some("/src/vault.cairo"));
        assert_eq!(ws.tabs.tabs().len(), 1);
        assert_eq!(ws.tabs.active().unwrap().content, "mod vault {}");
        assert!(file_tree::find(&ws.files, "/README.md").is_none());
        assert_eq!(ws.package_name(), None);
    }

    #[test]
    fn test_replace_project_without_cairo_opens_nothing() {
        let (mut ws, mut rng) = workspace();
        ws.open_file(&mut rng, "/README.md").unwrap();
        let imported = vec![FileNode::file("r", None, "README.md", "# docs")];
        assert_eq!(ws.replace_project(&mut rng, imported), None);
        assert!(ws.tabs.tabs().is_empty());
        assert_eq!(ws.files.len(), 1);
    }

    #[test]
    fn test_package_name() {
        let (mut ws, _) = workspace();
        assert_eq!(ws.package_name().as_deref(), Some("hello_starknet"));
        file_tree::update_content(&mut ws.files, "/Scarb.toml", "not toml [").unwrap();
        assert_eq!(ws.package_name(), None);
    }
}
