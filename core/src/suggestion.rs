//! Inline autocomplete suggestion.
//!
//! The suggestion is the full text of an item whose leading characters match
//! the current input under the collator. The focused item wins when it
//! matches, so the suggestion does not jump away from the highlighted row;
//! otherwise the first matching item in list order is used.

use crate::collator::Collator;
use crate::collection::Collection;
use crate::node::{Key, Node};

/// Whether the first `input.chars().count()` characters of `text` equal `input`.
pub fn prefix_matches(collator: &dyn Collator, text: &str, input: &str) -> bool {
    let len = input.chars().count();
    let prefix: String = text.chars().take(len).collect();
    if prefix.chars().count() < len {
        return false;
    }
    collator.equals(&prefix, input)
}

/// Compute the inline suggestion.
///
/// Returns `None` when the input is empty, when custom values are allowed,
/// or when no item matches.
pub fn suggest<T>(
    collection: &dyn Collection<T>,
    input: &str,
    focused_key: Option<&Key>,
    allows_custom_value: bool,
    collator: &dyn Collator,
) -> Option<String> {
    if input.is_empty() || allows_custom_value {
        return None;
    }

    let matches = |node: &Node<T>| prefix_matches(collator, &node.text_value, input);

    if let Some(node) = focused_key
        .and_then(|key| collection.get(key))
        .filter(|node| node.is_item())
    {
        if matches(node) {
            return Some(node.text_value.clone());
        }
    }

    collection
        .items()
        .find(|node| matches(*node))
        .map(|node| node.text_value.clone())
}
