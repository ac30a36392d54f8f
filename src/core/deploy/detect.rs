//! Contract detection over Cairo sources.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::file_tree;
use crate::models::{DetectedContract, FileNode};

/// `#[starknet::contract]`, then any attribute or comment lines, then `mod Name {`.
static CONTRACT_MOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"#\[starknet::contract\]",
        r"(?:\s*(?:#\[[^\n]*\]|//[^\n]*))*",
        r"\s*(?:pub\s+)?mod\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{",
    ))
    .expect("valid regex")
});

static CONSTRUCTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fn\s+constructor\s*\(\s*ref\s+self\s*:\s*ContractState\s*(?:,([^)]*))?\)")
        .expect("valid regex")
});

/// Contracts declared in one source file.
pub fn detect_in_source(path: &str, source: &str) -> Vec<DetectedContract> {
    let starts: Vec<(usize, String)> = CONTRACT_MOD
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.start(), caps.get(1)?.as_str().to_string()))
        })
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, (start, name))| {
            let end = starts.get(i + 1).map_or(source.len(), |(next, _)| *next);
            DetectedContract {
                name: name.clone(),
                path: path.to_string(),
                constructor_args: constructor_args(&source[*start..end]),
            }
        })
        .collect()
}

/// `name: Type` pairs following `ref self: ContractState`.
pub fn constructor_args(body: &str) -> Vec<(String, String)> {
    let Some(params) = CONSTRUCTOR.captures(body).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    params
        .as_str()
        .split(',')
        .filter_map(|param| {
            let (name, ty) = param.split_once(':')?;
            let (name, ty) = (name.trim(), ty.trim());
            (!name.is_empty() && !ty.is_empty()).then(|| (name.to_string(), ty.to_string()))
        })
        .collect()
}

/// Every contract in the workspace's `.cairo` files, in tree order.
pub fn detect_contracts(files: &[FileNode]) -> Vec<DetectedContract> {
    file_tree::files(files)
        .into_iter()
        .filter(|node| node.extension().as_deref() == Some("cairo"))
        .flat_map(|node| detect_in_source(&node.path, node.content.as_deref().unwrap_or("")))
        .collect()
}
