//! Keyboard focus over a collection.
//!
//! The focused key is the row highlighted for keyboard navigation. It is
//! distinct from the committed selection: moving focus never changes the
//! input value or the selected key. Navigation walks the prev/next chain of
//! the collection, skipping sections, and stops at either end.

use crate::collection::Collection;
use crate::node::Key;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    focused_key: Option<Key>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_key(&self) -> Option<&Key> {
        self.focused_key.as_ref()
    }

    /// Set the focused key. Returns true if it changed.
    pub fn set_focused_key(&mut self, key: Option<Key>) -> bool {
        if self.focused_key == key {
            return false;
        }
        self.focused_key = key;
        true
    }

    /// Focus the first item. Returns true if focus changed.
    pub fn focus_first<T>(&mut self, collection: &dyn Collection<T>) -> bool {
        let key = collection.items().next().map(|node| node.key.clone());
        self.set_focused_key(key)
    }

    /// Focus the last item. Returns true if focus changed.
    pub fn focus_last<T>(&mut self, collection: &dyn Collection<T>) -> bool {
        let key = collection.items().last().map(|node| node.key.clone());
        self.set_focused_key(key)
    }

    /// Move focus to the next item, or the first item when nothing is
    /// focused. Returns true if the focus moved.
    pub fn focus_next<T>(&mut self, collection: &dyn Collection<T>) -> bool {
        let Some(current) = self
            .focused_key
            .clone()
            .filter(|key| collection.get(key).is_some())
        else {
            return self.focus_first(collection);
        };
        let start = collection.key_after(&current);
        match next_item(collection, start, |k| collection.key_after(k)) {
            Some(key) => self.set_focused_key(Some(key)),
            None => false,
        }
    }

    /// Move focus to the previous item, or the last item when nothing is
    /// focused. Returns true if the focus moved.
    pub fn focus_previous<T>(&mut self, collection: &dyn Collection<T>) -> bool {
        let Some(current) = self
            .focused_key
            .clone()
            .filter(|key| collection.get(key).is_some())
        else {
            return self.focus_last(collection);
        };
        let start = collection.key_before(&current);
        match next_item(collection, start, |k| collection.key_before(k)) {
            Some(key) => self.set_focused_key(Some(key)),
            None => false,
        }
    }
}

/// Follow `step` from `start` until an item is found.
fn next_item<'a, T, F>(
    collection: &'a dyn Collection<T>,
    mut current: Option<&'a Key>,
    step: F,
) -> Option<Key>
where
    F: Fn(&'a Key) -> Option<&'a Key>,
{
    while let Some(key) = current {
        match collection.get(key) {
            Some(node) if node.is_item() => return Some(key.clone()),
            _ => current = step(key),
        }
    }
    None
}
