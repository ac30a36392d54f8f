//! Tab completion against the fixed command list.

use crate::config::terminal::COMPLETIONS;

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Exactly one command has the input as prefix.
    Single(String),
    /// Several candidates; the input is left untouched.
    Multiple(Vec<String>),
    /// No matches found.
    None,
}

/// Complete `input` against the command list.
///
/// Only a single unambiguous match is meant to replace the input.
pub fn autocomplete(input: &str) -> AutocompleteResult {
    let input = input.trim_start();
    if input.is_empty() {
        return AutocompleteResult::None;
    }

    let matches: Vec<String> = COMPLETIONS
        .iter()
        .filter(|cmd| cmd.starts_with(input))
        .map(|s| s.to_string())
        .collect();

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single(matches.into_iter().next().unwrap_or_default()),
        _ => AutocompleteResult::Multiple(matches),
    }
}

/// Ghost-text suffix shown while typing, when completion is unambiguous.
pub fn get_hint(input: &str) -> Option<String> {
    match autocomplete(input) {
        AutocompleteResult::Single(cmd) if cmd.len() > input.trim_start().len() => {
            Some(cmd[input.trim_start().len()..].to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_match() {
        assert_eq!(autocomplete("wh"), AutocompleteResult::Single("whoami".to_string()));
        assert_eq!(
            autocomplete("scarb b"),
            AutocompleteResult::Single("scarb build".to_string())
        );
        assert_eq!(
            autocomplete("cairo"),
            AutocompleteResult::Single("cairo-compile".to_string())
        );
    }

    #[test]
    fn test_ambiguous_match_does_not_complete() {
        match autocomplete("c") {
            AutocompleteResult::Multiple(matches) => {
                assert_eq!(matches, ["cd", "cat", "clear", "cairo-compile"]);
            }
            other => panic!("expected Multiple, got {:?}", other),
        }
        assert!(matches!(autocomplete("scarb"), AutocompleteResult::Multiple(_)));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(autocomplete(""), AutocompleteResult::None);
        assert_eq!(autocomplete("   "), AutocompleteResult::None);
        assert_eq!(autocomplete("xyz"), AutocompleteResult::None);
        assert_eq!(autocomplete("ls -la"), AutocompleteResult::None);
    }

    #[test]
    fn test_exact_command_is_single() {
        assert_eq!(autocomplete("pwd"), AutocompleteResult::Single("pwd".to_string()));
    }

    #[test]
    fn test_hint() {
        assert_eq!(get_hint("ec"), Some("ho".to_string()));
        assert_eq!(get_hint("echo"), None);
        assert_eq!(get_hint("c"), None);
    }
}
