//! Custom hooks for terminal components.
//!
//! Provides reusable stateful logic for terminal input handling.

use leptos::prelude::*;

/// Candidates listed after an ambiguous Tab press.
///
/// The input is left untouched until a candidate is clicked.
#[derive(Clone, Copy)]
pub struct SuggestionState {
    pub matches: RwSignal<Vec<String>>,
}

impl SuggestionState {
    pub fn new() -> Self {
        Self {
            matches: RwSignal::new(vec![]),
        }
    }

    pub fn show(&self, matches: Vec<String>) {
        self.matches.set(matches);
    }

    pub fn clear(&self) {
        if self.matches.with_untracked(|m| !m.is_empty()) {
            self.matches.set(vec![]);
        }
    }
}

impl Default for SuggestionState {
    fn default() -> Self {
        Self::new()
    }
}

/// State for inline ghost text hints.
///
/// Shows a dimmed completion suggestion after the cursor.
#[derive(Clone, Copy)]
pub struct HintState {
    /// Current hint text to display after user input.
    pub hint: RwSignal<Option<String>>,
}

impl HintState {
    pub fn new() -> Self {
        Self {
            hint: RwSignal::new(None),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.hint.get()
    }

    pub fn set(&self, value: Option<String>) {
        self.hint.set(value);
    }

    pub fn clear(&self) {
        self.hint.set(None);
    }
}

impl Default for HintState {
    fn default() -> Self {
        Self::new()
    }
}
