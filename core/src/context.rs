//! Snapshot of combo-box state for the host renderer.
//!
//! `ComboBoxContext` is plain data with public fields. After driving the
//! state machine, a host reads it to paint the input, the inline suggestion
//! and the popup rows. It owns its data and does not borrow the state.

use crate::node::Key;

/// One visible row of the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRow {
    pub key: Key,
    pub text: String,
    /// Nesting depth (0 for top-level rows)
    pub level: usize,
    pub is_section: bool,
    pub is_focused: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboBoxContext {
    /// Text shown in the input
    pub input_value: String,

    pub selected_key: Option<Key>,

    /// Inline completion of `input_value`, if any
    pub suggested_value: Option<String>,

    /// Effective open state (requested open and input focused)
    pub is_open: bool,

    pub focused_key: Option<Key>,

    /// Rows of the filtered view in visit order
    pub rows: Vec<ContextRow>,
}

impl ComboBoxContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selectable rows.
    pub fn item_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_section).count()
    }

    /// Whether the popup has anything to show.
    pub fn has_visible_state(&self) -> bool {
        self.is_open && self.item_count() > 0
    }

    /// The part of the suggestion that extends past the typed text.
    pub fn suggestion_tail(&self) -> Option<&str> {
        let suggestion = self.suggested_value.as_deref()?;
        let typed = self.input_value.chars().count();
        let offset = suggestion
            .char_indices()
            .nth(typed)
            .map(|(i, _)| i)
            .unwrap_or(suggestion.len());
        Some(&suggestion[offset..])
    }
}
