//! Hardcoded directory map the terminal navigates.
//!
//! This is deliberately separate from the IDE's project tree: terminal
//! commands operate on a fixed illustrative layout under `/home/starknet`.

use crate::config::{template, terminal::HOME};

const DIRECTORIES: &[&str] = &[
    "/",
    "/home",
    "/home/starknet",
    "/home/starknet/project",
    "/home/starknet/project/src",
    "/home/starknet/project/target",
    "/home/starknet/project/target/dev",
    "/home/starknet/project/tests",
    "/tmp",
];

const CONTRACT_CLASS_JSON: &str = r#"{
  "sierra_program": ["0x1", "0x6", "0x0", "0x2", "0x8", "0x2"],
  "contract_class_version": "0.1.0",
  "entry_points_by_type": { "EXTERNAL": [], "L1_HANDLER": [], "CONSTRUCTOR": [] },
  "abi": []
}"#;

const BASHRC: &str = "export PATH=\"$HOME/.local/bin:$PATH\"\nalias sb='scarb build'";

const FILES: &[(&str, &str)] = &[
    ("/home/starknet/.bashrc", BASHRC),
    ("/home/starknet/project/Scarb.toml", template::SCARB_TOML),
    ("/home/starknet/project/README.md", template::README_MD),
    ("/home/starknet/project/src/lib.cairo", template::LIB_CAIRO),
    ("/home/starknet/project/src/counter.cairo", template::COUNTER_CAIRO),
    (
        "/home/starknet/project/tests/test_counter.cairo",
        template::TEST_COUNTER_CAIRO,
    ),
    (
        "/home/starknet/project/target/dev/hello_starknet_HelloStarknet.contract_class.json",
        CONTRACT_CLASS_JSON,
    ),
];

/// Directory listing entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockEntry {
    pub name: &'static str,
    pub is_dir: bool,
}

/// Normalize `target` against `cwd` into an absolute path.
///
/// Handles `~`, `.`, `..`, absolute and relative paths. The result is not
/// checked for existence.
pub fn resolve(cwd: &str, target: &str) -> String {
    let base = if target == "~" || target.starts_with("~/") {
        format!("{}{}", HOME, &target[1..])
    } else if target.starts_with('/') {
        target.to_string()
    } else {
        format!("{}/{}", cwd, target)
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in base.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}

pub fn is_dir(path: &str) -> bool {
    DIRECTORIES.contains(&path)
}

/// Content of a file, if `path` names one.
pub fn read_file(path: &str) -> Option<&'static str> {
    FILES.iter().find(|(p, _)| *p == path).map(|(_, c)| *c)
}

/// Children of a directory: directories first, each group sorted by name.
pub fn list_dir(path: &str) -> Option<Vec<MockEntry>> {
    if !is_dir(path) {
        return None;
    }

    let mut dirs: Vec<MockEntry> = DIRECTORIES
        .iter()
        .filter(|d| parent_of(d) == Some(path))
        .map(|d| MockEntry {
            name: file_name(d),
            is_dir: true,
        })
        .collect();
    let mut files: Vec<MockEntry> = FILES
        .iter()
        .filter(|(p, _)| parent_of(p) == Some(path))
        .map(|(p, _)| MockEntry {
            name: file_name(p),
            is_dir: false,
        })
        .collect();

    dirs.sort_by_key(|e| e.name);
    files.sort_by_key(|e| e.name);
    dirs.extend(files);
    Some(dirs)
}

/// Render the subtree under `path` in `tree` style.
pub fn tree_lines(path: &str) -> Option<Vec<String>> {
    list_dir(path)?;
    let mut lines = vec![".".to_string()];
    let (mut dirs, mut files) = (0, 0);
    render_tree(path, "", &mut lines, &mut dirs, &mut files);
    lines.push(String::new());
    lines.push(format!("{} directories, {} files", dirs, files));
    Some(lines)
}

fn render_tree(path: &str, prefix: &str, lines: &mut Vec<String>, dirs: &mut usize, files: &mut usize) {
    let entries = list_dir(path).unwrap_or_default();
    let count = entries.len();
    for (i, entry) in entries.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, branch, entry.name));
        if entry.is_dir {
            *dirs += 1;
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            let child_path = if path == "/" {
                format!("/{}", entry.name)
            } else {
                format!("{}/{}", path, entry.name)
            };
            render_tree(&child_path, &child_prefix, lines, dirs, files);
        } else {
            *files += 1;
        }
    }
}

/// Display form of a path with the home directory abbreviated to `~`.
pub fn display_path(path: &str) -> String {
    if path == HOME {
        "~".to_string()
    } else if let Some(rest) = path.strip_prefix(HOME).filter(|r| r.starts_with('/')) {
        format!("~{}", rest)
    } else {
        path.to_string()
    }
}

fn parent_of(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

fn file_name(path: &'static str) -> &'static str {
    path.rsplit('/').next().unwrap_or(path)
}
