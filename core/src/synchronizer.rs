//! Two-way binding between the input text and the selected key.
//!
//! Three transitions keep the pair consistent:
//!
//! 1. **Text edit**: the user typed. The new text becomes the input value and
//!    the selected key is recomputed by exact (case-sensitive) text lookup in
//!    the unfiltered collection. No exact match means no selection.
//! 2. **Selection**: a key was chosen (pointer, Enter, or prop). The input
//!    value becomes the item's text. Keys missing from the collection are
//!    treated as "nothing selected" and clear the text.
//! 3. **Selected-key prop**: the host pushed a selected key. It drives
//!    transition 2 once per distinct value; repeats of the last seen value are
//!    ignored so an echoed prop cannot loop back into the engine.
//!
//! The synchronizer only computes; it reports which notifications are due in
//! `SyncEffects` and leaves dispatching them to the caller.

use crate::collection::Collection;
use crate::controlled::ControlledState;
use crate::error::{Error, Result};
use crate::node::Key;

/// Initial values and ownership of the synchronized pair.
#[derive(Debug, Clone, Default)]
pub struct SyncInit {
    /// Controlled input value.
    pub input_value: Option<String>,
    pub default_input_value: Option<String>,
    /// Controlled selected key; `Some(None)` is "controlled, nothing selected".
    pub selected_key: Option<Option<Key>>,
    pub default_selected_key: Option<Key>,
}

/// Notifications produced by a transition, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncEffects {
    /// Fire the input-change callback with this value.
    pub input_changed: Option<String>,
    /// Fire the selection-change callback with this key.
    pub selection_changed: Option<Option<Key>>,
}

impl SyncEffects {
    pub fn is_empty(&self) -> bool {
        self.input_changed.is_none() && self.selection_changed.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ValueSynchronizer {
    input_value: ControlledState<String>,
    selected_key: ControlledState<Option<Key>>,
    /// Last selected-key prop seen from the host.
    last_seen_selected_key: Option<Option<Key>>,
}

impl ValueSynchronizer {
    /// Build the initial state.
    ///
    /// Fails with `Error::SelectionMismatch` when both a controlled selected
    /// key and a controlled input value are supplied and the item's text does
    /// not equal the input value.
    pub fn new<T>(collection: &dyn Collection<T>, init: SyncInit) -> Result<Self> {
        if let (Some(Some(key)), Some(input_value)) = (&init.selected_key, &init.input_value) {
            let item_text = collection
                .get(key)
                .filter(|node| node.is_item())
                .map(|node| node.text_value.clone());
            if item_text.as_deref() != Some(input_value.as_str()) {
                return Err(Error::SelectionMismatch {
                    key: key.clone(),
                    item_text,
                    input_value: input_value.clone(),
                });
            }
        }

        let selected_key =
            ControlledState::new(init.selected_key.clone(), init.default_selected_key);

        let default_input = init
            .default_input_value
            .or_else(|| {
                selected_key
                    .get()
                    .as_ref()
                    .and_then(|key| collection.get(key))
                    .filter(|node| node.is_item() && !node.text_value.is_empty())
                    .map(|node| node.text_value.clone())
            })
            .unwrap_or_default();
        let input_value = ControlledState::new(init.input_value, default_input);

        Ok(Self {
            input_value,
            selected_key,
            last_seen_selected_key: init.selected_key,
        })
    }

    pub fn input_value(&self) -> &str {
        self.input_value.get()
    }

    pub fn selected_key(&self) -> Option<&Key> {
        self.selected_key.get().as_ref()
    }

    pub fn is_input_controlled(&self) -> bool {
        self.input_value.is_controlled()
    }

    pub fn is_selection_controlled(&self) -> bool {
        self.selected_key.is_controlled()
    }

    /// Transition 1: the user edited the text.
    pub fn edit_text<T>(&mut self, collection: &dyn Collection<T>, text: &str) -> SyncEffects {
        let mut effects = SyncEffects::default();
        if self.input_value.request(text.to_string()) {
            effects.input_changed = Some(text.to_string());
        }

        let new_key = collection.item_by_text(text).map(|node| node.key.clone());
        if new_key.as_ref() != self.selected_key() {
            tracing::debug!(?new_key, "text edit changed selection");
            self.selected_key.request(new_key.clone());
            effects.selection_changed = Some(new_key);
        }
        effects
    }

    /// Transition 2: a key was selected.
    pub fn select_key<T>(
        &mut self,
        collection: &dyn Collection<T>,
        key: Option<Key>,
    ) -> SyncEffects {
        let (resolved, text) = resolve(collection, key);

        let mut effects = SyncEffects::default();
        let text_changes = text
            .as_ref()
            .is_some_and(|text| text.as_str() != self.input_value());
        let key_changes = resolved.as_ref() != self.selected_key();

        if let Some(text) = text.filter(|_| text_changes) {
            self.input_value.request(text.clone());
            effects.input_changed = Some(text);
        }
        if text_changes || key_changes {
            tracing::debug!(?resolved, text_changes, key_changes, "selection changed");
            self.selected_key.request(resolved.clone());
            effects.selection_changed = Some(resolved);
        }
        effects
    }

    /// Transition 3: the host pushed a selected-key prop.
    ///
    /// Returns `None` when the prop equals the last one seen.
    pub fn sync_selected_key_prop<T>(
        &mut self,
        collection: &dyn Collection<T>,
        key: Option<Key>,
    ) -> Option<SyncEffects> {
        if self.last_seen_selected_key.as_ref() == Some(&key) {
            return None;
        }
        self.last_seen_selected_key = Some(key.clone());

        // A controlled prop is already the host's value; record it so only
        // the text follows and the selection is not echoed back.
        if !self.selected_key.is_controlled() {
            return Some(self.select_key(collection, key));
        }
        let (resolved, _) = resolve(collection, key.clone());
        self.selected_key.sync(resolved);
        let mut effects = self.select_key(collection, key);
        effects.selection_changed = None;
        Some(effects)
    }

    /// Host-side update of a controlled input value. Ignored when the input
    /// is uncontrolled. Returns true on change.
    pub fn sync_input_value_prop(&mut self, value: String) -> bool {
        if !self.input_value.is_controlled() {
            return false;
        }
        self.input_value.sync(value)
    }
}

/// Resolve a key against the collection.
///
/// Returns the key to record and the text the input should show. The text is
/// `None` for items with empty text (the input is left alone), and empty for
/// absent keys.
fn resolve<T>(collection: &dyn Collection<T>, key: Option<Key>) -> (Option<Key>, Option<String>) {
    match key {
        Some(key) => match collection.get(&key).filter(|node| node.is_item()) {
            Some(node) if node.text_value.is_empty() => (Some(key), None),
            Some(node) => {
                let text = node.text_value.clone();
                (Some(key), Some(text))
            }
            None => {
                tracing::debug!(%key, "selected key not in collection; treating as no selection");
                (None, Some(String::new()))
            }
        },
        None => (None, Some(String::new())),
    }
}
