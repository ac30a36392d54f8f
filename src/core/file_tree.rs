//! Operations over the in-memory project tree.
//!
//! The tree is a forest of top-level [`FileNode`]s. All lookups are by path;
//! mutations keep the `path = parent path + name` invariant intact.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::Rng;

use crate::config::template;
use crate::core::error::FileTreeError;
use crate::core::random::new_id;
use crate::models::{FileNode, parent_path};

/// A content match produced by [`search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub path: String,
    /// 1-based line number
    pub line: usize,
    pub text: String,
}

/// One visible line of the explorer view.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutlineRow {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub is_folder: bool,
    pub expanded: bool,
}

/// Flatten the tree into visible rows, skipping children of collapsed folders.
pub fn outline(nodes: &[FileNode], collapsed: &HashSet<String>) -> Vec<OutlineRow> {
    fn walk(
        nodes: &[FileNode],
        collapsed: &HashSet<String>,
        depth: usize,
        out: &mut Vec<OutlineRow>,
    ) {
        for node in nodes {
            let expanded = node.is_folder() && !collapsed.contains(&node.path);
            out.push(OutlineRow {
                path: node.path.clone(),
                name: node.name.clone(),
                depth,
                is_folder: node.is_folder(),
                expanded,
            });
            if expanded {
                walk(&node.children, collapsed, depth + 1, out);
            }
        }
    }

    let mut rows = Vec::new();
    walk(nodes, collapsed, 0, &mut rows);
    rows
}

/// Find a node by path.
pub fn find<'a>(nodes: &'a [FileNode], path: &str) -> Option<&'a FileNode> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }
        if node.is_folder() && is_ancestor(&node.path, path) {
            return find(&node.children, path);
        }
    }
    None
}

/// Find a node by path, mutably.
pub fn find_mut<'a>(nodes: &'a mut [FileNode], path: &str) -> Option<&'a mut FileNode> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }
        if node.is_folder() && is_ancestor(&node.path, path) {
            return find_mut(&mut node.children, path);
        }
    }
    None
}

/// Replace the content of the file at `path`.
pub fn update_content(
    nodes: &mut [FileNode],
    path: &str,
    content: impl Into<String>,
) -> Result<(), FileTreeError> {
    let node = find_mut(nodes, path).ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
    if !node.is_file() {
        return Err(FileTreeError::NotAFile(path.to_string()));
    }
    node.content = Some(content.into());
    Ok(())
}

/// Insert `node` under the folder at `parent` (`None` for the root).
///
/// The node's path (and its descendants') is recomputed from the parent.
/// Siblings are kept folders first, then files, each ordered by name.
pub fn insert(
    nodes: &mut Vec<FileNode>,
    parent: Option<&str>,
    mut node: FileNode,
) -> Result<String, FileTreeError> {
    validate_name(&node.name)?;

    let siblings = match parent {
        None => nodes,
        Some(parent_path) => {
            let folder = find_mut(nodes, parent_path)
                .ok_or_else(|| FileTreeError::NotFound(parent_path.to_string()))?;
            if !folder.is_folder() {
                return Err(FileTreeError::NotAFolder(parent_path.to_string()));
            }
            &mut folder.children
        }
    };

    if siblings.iter().any(|s| s.name == node.name) {
        return Err(FileTreeError::AlreadyExists(node.name));
    }

    node.reparent(parent);
    let path = node.path.clone();
    let index = siblings
        .iter()
        .position(|s| sibling_order(&node, s) == Ordering::Less)
        .unwrap_or(siblings.len());
    siblings.insert(index, node);
    Ok(path)
}

/// Remove and return the node at `path`.
pub fn remove(nodes: &mut Vec<FileNode>, path: &str) -> Result<FileNode, FileTreeError> {
    let siblings = match parent_path(path) {
        None => nodes,
        Some(parent) => {
            &mut find_mut(nodes, parent)
                .filter(|n| n.is_folder())
                .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?
                .children
        }
    };
    let index = siblings
        .iter()
        .position(|n| n.path == path)
        .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
    Ok(siblings.remove(index))
}

/// Rename the node at `path`, returning its new path.
pub fn rename(
    nodes: &mut Vec<FileNode>,
    path: &str,
    new_name: &str,
) -> Result<String, FileTreeError> {
    validate_name(new_name)?;
    if find(nodes, path).is_none() {
        return Err(FileTreeError::NotFound(path.to_string()));
    }
    let parent = parent_path(path).map(str::to_string);
    let siblings = match parent.as_deref() {
        None => nodes.as_slice(),
        Some(p) => find(nodes, p).map(|n| n.children.as_slice()).unwrap_or_default(),
    };
    if siblings.iter().any(|s| s.name == new_name && s.path != path) {
        return Err(FileTreeError::AlreadyExists(new_name.to_string()));
    }

    // Reinsert so the sibling ordering stays intact.
    let mut node = remove(nodes, path)?;
    node.name = new_name.to_string();
    insert(nodes, parent.as_deref(), node)
}

/// All files in depth-first order.
pub fn files(nodes: &[FileNode]) -> Vec<&FileNode> {
    let mut out = Vec::new();
    collect_files(nodes, &mut out);
    out
}

fn collect_files<'a>(nodes: &'a [FileNode], out: &mut Vec<&'a FileNode>) {
    for node in nodes {
        if node.is_file() {
            out.push(node);
        } else {
            collect_files(&node.children, out);
        }
    }
}

/// First `.cairo` file in tree order.
pub fn first_cairo_file(nodes: &[FileNode]) -> Option<&FileNode> {
    nodes.iter().find_map(|node| {
        if node.is_file() {
            node.name.ends_with(".cairo").then_some(node)
        } else {
            first_cairo_file(&node.children)
        }
    })
}

/// Case-insensitive substring search over every file's content.
pub fn search(nodes: &[FileNode], query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    files(nodes)
        .into_iter()
        .flat_map(|file| {
            let content = file.content.as_deref().unwrap_or_default();
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.to_lowercase().contains(&needle))
                .map(|(i, line)| SearchHit {
                    path: file.path.clone(),
                    line: i + 1,
                    text: line.trim().to_string(),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Check a file or folder name.
pub fn validate_name(name: &str) -> Result<(), FileTreeError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed != name || name.contains('/') || name == "." || name == ".."
    {
        return Err(FileTreeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// True when `path` lies strictly inside `ancestor`.
pub fn is_ancestor(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

fn sibling_order(a: &FileNode, b: &FileNode) -> Ordering {
    match (a.is_folder(), b.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

/// Scarb project template rooted at `root` (`None` places it at the tree root).
pub fn project_template<R: Rng + ?Sized>(
    rng: &mut R,
    root: Option<&str>,
    package_name: &str,
) -> Vec<FileNode> {
    let scarb = template::SCARB_TOML.replacen("hello_starknet", package_name, 1);
    let readme = template::README_MD.replacen("hello_starknet", package_name, 1);
    let mut nodes = Vec::new();

    let src = FileNode::folder(new_id(rng), root, "src");
    let src_path = src.path.clone();
    let src = src
        .with_child(FileNode::file(
            new_id(rng),
            Some(&src_path),
            "counter.cairo",
            template::COUNTER_CAIRO,
        ))
        .with_child(FileNode::file(
            new_id(rng),
            Some(&src_path),
            "lib.cairo",
            template::LIB_CAIRO,
        ));

    let tests = FileNode::folder(new_id(rng), root, "tests");
    let tests_path = tests.path.clone();
    let tests = tests.with_child(FileNode::file(
        new_id(rng),
        Some(&tests_path),
        "test_counter.cairo",
        template::TEST_COUNTER_CAIRO,
    ));

    nodes.push(src);
    nodes.push(tests);
    nodes.push(FileNode::file(new_id(rng), root, "README.md", readme));
    nodes.push(FileNode::file(new_id(rng), root, "Scarb.toml", scarb));
    nodes
}

/// Tree shown on first launch.
pub fn default_tree<R: Rng + ?Sized>(rng: &mut R) -> Vec<FileNode> {
    project_template(rng, None, "hello_starknet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn tree() -> Vec<FileNode> {
        default_tree(&mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_find() {
        let nodes = tree();
        assert!(find(&nodes, "/src").unwrap().is_folder());
        assert!(find(&nodes, "/src/lib.cairo").unwrap().is_file());
        assert!(find(&nodes, "/Scarb.toml").is_some());
        assert!(find(&nodes, "/src/missing.cairo").is_none());
        assert!(find(&nodes, "/sr").is_none());
    }

    #[test]
    fn test_default_tree_paths_are_consistent() {
        fn check(nodes: &[FileNode], parent: Option<&str>) {
            for node in nodes {
                assert_eq!(node.path, crate::models::join_path(parent, &node.name));
                check(&node.children, Some(&node.path));
            }
        }
        check(&tree(), None);
    }

    #[test]
    fn test_update_content() {
        let mut nodes = tree();
        update_content(&mut nodes, "/src/lib.cairo", "mod x {}").unwrap();
        assert_eq!(
            find(&nodes, "/src/lib.cairo").unwrap().content.as_deref(),
            Some("mod x {}")
        );
        assert_eq!(
            update_content(&mut nodes, "/src", "x"),
            Err(FileTreeError::NotAFile("/src".to_string()))
        );
        assert_eq!(
            update_content(&mut nodes, "/nope", "x"),
            Err(FileTreeError::NotFound("/nope".to_string()))
        );
    }

    #[test]
    fn test_insert_orders_folders_first() {
        let mut nodes = tree();
        insert(&mut nodes, None, FileNode::folder("f", None, "zeta")).unwrap();
        insert(&mut nodes, None, FileNode::file("a", None, "AAA.md", "")).unwrap();
        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["src", "tests", "zeta", "AAA.md", "README.md", "Scarb.toml"]);
    }

    #[test]
    fn test_insert_under_parent_sets_path() {
        let mut nodes = tree();
        let path = insert(
            &mut nodes,
            Some("/src"),
            FileNode::file("x", None, "erc20.cairo", ""),
        )
        .unwrap();
        assert_eq!(path, "/src/erc20.cairo");
        assert!(find(&nodes, "/src/erc20.cairo").is_some());
    }

    #[test]
    fn test_insert_errors() {
        let mut nodes = tree();
        assert_eq!(
            insert(&mut nodes, Some("/src"), FileNode::file("x", None, "lib.cairo", "")),
            Err(FileTreeError::AlreadyExists("lib.cairo".to_string()))
        );
        assert_eq!(
            insert(&mut nodes, Some("/Scarb.toml"), FileNode::file("x", None, "a", "")),
            Err(FileTreeError::NotAFolder("/Scarb.toml".to_string()))
        );
        assert_eq!(
            insert(&mut nodes, Some("/nope"), FileNode::file("x", None, "a", "")),
            Err(FileTreeError::NotFound("/nope".to_string()))
        );
        assert!(matches!(
            insert(&mut nodes, None, FileNode::file("x", None, "a/b", "")),
            Err(FileTreeError::InvalidName(_))
        ));
    }

    #[test]
    fn test_create_then_delete_round_trip() {
        let original = tree();
        let mut nodes = original.clone();
        let path = insert(
            &mut nodes,
            Some("/tests"),
            FileNode::file("x", None, "test_new.cairo", "#[test]"),
        )
        .unwrap();
        assert_ne!(nodes, original);
        remove(&mut nodes, &path).unwrap();
        assert_eq!(nodes, original);
    }

    #[test]
    fn test_remove_folder_removes_subtree() {
        let mut nodes = tree();
        let removed = remove(&mut nodes, "/src").unwrap();
        assert_eq!(removed.children.len(), 2);
        assert!(find(&nodes, "/src/lib.cairo").is_none());
        assert!(remove(&mut nodes, "/src").is_err());
    }

    #[test]
    fn test_rename_recomputes_paths() {
        let mut nodes = tree();
        let new_path = rename(&mut nodes, "/src", "contracts").unwrap();
        assert_eq!(new_path, "/contracts");
        assert!(find(&nodes, "/contracts/lib.cairo").is_some());
        assert!(find(&nodes, "/src").is_none());
        assert_eq!(
            rename(&mut nodes, "/contracts", "tests"),
            Err(FileTreeError::AlreadyExists("tests".to_string()))
        );
    }

    #[test]
    fn test_files_and_search() {
        let nodes = tree();
        assert_eq!(files(&nodes).len(), 5);

        let hits = search(&nodes, "STARKNET::CONTRACT");
        let found: Vec<_> = hits.iter().map(|h| (h.path.as_str(), h.line)).collect();
        assert_eq!(
            found,
            [("/src/counter.cairo", 7), ("/src/counter.cairo", 9), ("/src/lib.cairo", 9)]
        );
        assert_eq!(hits[1].text, "use starknet::ContractAddress;");

        let attrs = search(&nodes, "#[starknet::contract]");
        assert_eq!(attrs.len(), 2);
        assert!(attrs.iter().all(|h| h.text == "#[starknet::contract]"));
        assert!(search(&nodes, "   ").is_empty());
    }

    #[test]
    fn test_first_cairo_file() {
        let nodes = tree();
        assert_eq!(first_cairo_file(&nodes).unwrap().path, "/src/counter.cairo");

        let docs = vec![FileNode::file("r", None, "README.md", "")];
        assert!(first_cairo_file(&docs).is_none());
    }

    #[test]
    fn test_is_ancestor() {
        assert!(is_ancestor("/src", "/src/lib.cairo"));
        assert!(!is_ancestor("/src", "/src"));
        assert!(!is_ancestor("/src", "/srcx/lib.cairo"));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("lib.cairo").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(" lib").is_err());
        assert!(validate_name("..").is_err());
    }

    #[test]
    fn test_outline_respects_collapsed_folders() {
        let nodes = tree();
        let rows = outline(&nodes, &HashSet::new());
        let paths: Vec<_> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "/src",
                "/src/counter.cairo",
                "/src/lib.cairo",
                "/tests",
                "/tests/test_counter.cairo",
                "/README.md",
                "/Scarb.toml",
            ]
        );
        assert_eq!(rows[1].depth, 1);

        let collapsed = HashSet::from(["/src".to_string()]);
        let rows = outline(&nodes, &collapsed);
        assert_eq!(rows.len(), 5);
        assert!(!rows[0].expanded);
    }
}
