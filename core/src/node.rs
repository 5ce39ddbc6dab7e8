//! Collection nodes and the tree description they are built from.
//!
//! A `Node` is one entry of a collection: either a selectable item or a
//! section grouping items. Nodes are owned by the collection that built them
//! and carry traversal links (`prev_key`/`next_key`) computed over the
//! flattened visit order of that collection. A filtered view builds its own
//! nodes instead of touching the source ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable unique identifier of a collection node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for Key {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Kind of a collection node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Selectable entry, participates in text matching
    Item,
    /// Grouping of items; visited during traversal but never matched
    Section,
}

/// One entry of a collection.
#[derive(Debug)]
pub struct Node<T> {
    pub key: Key,
    pub node_type: NodeType,
    /// Match text for items, title for sections.
    pub text_value: String,
    /// Caller data attached to the entry.
    pub value: Option<Arc<T>>,
    /// Children in order. Always empty for items.
    pub child_keys: Vec<Key>,
    pub parent_key: Option<Key>,
    /// Nesting depth, 0 for top-level nodes.
    pub level: usize,
    /// Position among items of the collection (sections are not counted).
    pub index: Option<usize>,
    pub prev_key: Option<Key>,
    pub next_key: Option<Key>,
}

// Manual impl: cloning shares `value` and must not require `T: Clone`.
impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            node_type: self.node_type,
            text_value: self.text_value.clone(),
            value: self.value.clone(),
            child_keys: self.child_keys.clone(),
            parent_key: self.parent_key.clone(),
            level: self.level,
            index: self.index,
            prev_key: self.prev_key.clone(),
            next_key: self.next_key.clone(),
        }
    }
}

impl<T> Node<T> {
    pub fn is_item(&self) -> bool {
        self.node_type == NodeType::Item
    }

    pub fn is_section(&self) -> bool {
        self.node_type == NodeType::Section
    }

    pub fn has_children(&self) -> bool {
        !self.child_keys.is_empty()
    }
}

/// Serde-loadable description of a collection tree.
///
/// Entries without a key get one derived from their position (`$.0`,
/// `$.1.2`, ...).
///
/// ```
/// # use libcombobox_core::Entry;
/// let json = r#"[
///     {"type": "item", "key": "apple", "text": "Apple"},
///     {"type": "section", "title": "Vegetables", "children": [
///         {"type": "item", "text": "Carrot"}
///     ]}
/// ]"#;
/// let entries: Vec<Entry<()>> = serde_json::from_str(json).unwrap();
/// assert_eq!(entries.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub enum Entry<T> {
    Item {
        #[serde(default)]
        key: Option<Key>,
        text: String,
        value: Option<T>,
    },
    Section {
        #[serde(default)]
        key: Option<Key>,
        #[serde(default)]
        title: String,
        #[serde(default)]
        children: Vec<Entry<T>>,
    },
}

impl<T> Entry<T> {
    /// An item whose key is given explicitly.
    pub fn item(key: impl Into<Key>, text: impl Into<String>) -> Self {
        Self::Item {
            key: Some(key.into()),
            text: text.into(),
            value: None,
        }
    }

    /// An item with caller data attached.
    pub fn item_with_value(key: impl Into<Key>, text: impl Into<String>, value: T) -> Self {
        Self::Item {
            key: Some(key.into()),
            text: text.into(),
            value: Some(value),
        }
    }

    /// An item whose key is derived from its position.
    pub fn unkeyed_item(text: impl Into<String>) -> Self {
        Self::Item {
            key: None,
            text: text.into(),
            value: None,
        }
    }

    pub fn section(key: impl Into<Key>, title: impl Into<String>, children: Vec<Entry<T>>) -> Self {
        Self::Section {
            key: Some(key.into()),
            title: title.into(),
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_conversions() {
        assert_eq!(Key::from("a"), Key::new("a"));
        assert_eq!(Key::from(7u64).as_str(), "7");
        assert_eq!(Key::from("x".to_string()).to_string(), "x");
    }

    #[test]
    fn test_entry_json_shape() {
        let json = r#"[
            {"type": "item", "key": "k1", "text": "One", "value": 1},
            {"type": "section", "key": "s", "title": "S", "children": [
                {"type": "item", "text": "Two"}
            ]}
        ]"#;
        let entries: Vec<Entry<u32>> = serde_json::from_str(json).unwrap();
        match &entries[0] {
            Entry::Item { key, text, value } => {
                assert_eq!(key.as_ref().unwrap().as_str(), "k1");
                assert_eq!(text, "One");
                assert_eq!(*value, Some(1));
            }
            _ => panic!("expected item"),
        }
        match &entries[1] {
            Entry::Section { children, .. } => {
                assert!(matches!(&children[0], Entry::Item { key: None, .. }));
            }
            _ => panic!("expected section"),
        }
    }

    #[test]
    fn test_node_clone_does_not_need_clone_value() {
        struct Opaque;
        let node: Node<Opaque> = Node {
            key: Key::from("a"),
            node_type: NodeType::Item,
            text_value: "A".into(),
            value: Some(Arc::new(Opaque)),
            child_keys: Vec::new(),
            parent_key: None,
            level: 0,
            index: Some(0),
            prev_key: None,
            next_key: None,
        };
        let copy = node.clone();
        assert!(Arc::ptr_eq(node.value.as_ref().unwrap(), copy.value.as_ref().unwrap()));
        assert!(copy.is_item());
    }
}
