//! Keyed, ordered collections of nodes.
//!
//! `Collection` is the capability set the combo-box engine needs from any
//! list: ordered iteration, lookup by key, first/last key, key before/after
//! a key, and size. Two implementations exist: `ListCollection` (the
//! unfiltered base, built from `Entry` trees) and `FilteredCollection` (see
//! `filter.rs`). Both store their nodes in a `NodeTable`, an arena keyed by
//! `Key` whose links are computed once when the table is built.

use ahash::AHashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::node::{Entry, Key, Node, NodeType};

/// Capability interface shared by base and filtered collections.
pub trait Collection<T> {
    /// Top-level nodes in order.
    fn iter(&self) -> Nodes<'_, T>;

    /// Every node (sections included) in flattened, depth-first visit order.
    fn visit_order(&self) -> Nodes<'_, T>;

    /// Children of the node with the given key, in order.
    fn children(&self, key: &Key) -> Nodes<'_, T>;

    fn get(&self, key: &Key) -> Option<&Node<T>>;

    fn first_key(&self) -> Option<&Key>;

    fn last_key(&self) -> Option<&Key>;

    /// Number of keyed nodes, items and sections alike.
    fn size(&self) -> usize;

    fn key_before<'a>(&'a self, key: &Key) -> Option<&'a Key>
    where
        T: 'a,
    {
        self.get(key)?.prev_key.as_ref()
    }

    fn key_after<'a>(&'a self, key: &Key) -> Option<&'a Key>
    where
        T: 'a,
    {
        self.get(key)?.next_key.as_ref()
    }

    /// Items only, in flattened visit order.
    fn items(&self) -> Items<'_, T> {
        Items {
            inner: self.visit_order(),
        }
    }

    /// Whether at least one item (not merely a section) is present.
    fn has_items(&self) -> bool {
        self.items().next().is_some()
    }

    /// First item whose text equals `text` exactly (case-sensitive).
    fn item_by_text(&self, text: &str) -> Option<&Node<T>> {
        self.items().find(|node| node.text_value == text)
    }
}

/// Iterator over nodes addressed by a slice of keys.
pub struct Nodes<'a, T> {
    keys: std::slice::Iter<'a, Key>,
    nodes: &'a AHashMap<Key, Node<T>>,
}

impl<'a, T> Nodes<'a, T> {
    fn empty(nodes: &'a AHashMap<Key, Node<T>>) -> Self {
        let keys: &'a [Key] = &[];
        Self {
            keys: keys.iter(),
            nodes,
        }
    }
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        self.nodes.get(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

/// Items of a collection in visit order, sections skipped.
pub struct Items<'a, T> {
    inner: Nodes<'a, T>,
}

impl<'a, T> Iterator for Items<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find(|node| node.is_item())
    }
}

/// Node of a tree that has not been linked yet.
pub(crate) struct Draft<T> {
    pub key: Key,
    pub node_type: NodeType,
    pub text_value: String,
    pub value: Option<Arc<T>>,
    pub children: Vec<Draft<T>>,
}

impl<T> Draft<T> {
    /// Copy of a linked node without its children or links.
    pub fn detached(node: &Node<T>) -> Self {
        Self {
            key: node.key.clone(),
            node_type: node.node_type,
            text_value: node.text_value.clone(),
            value: node.value.clone(),
            children: Vec::new(),
        }
    }
}

/// Arena of linked nodes plus the orderings collections expose.
#[derive(Debug)]
pub(crate) struct NodeTable<T> {
    nodes: AHashMap<Key, Node<T>>,
    roots: Vec<Key>,
    order: Vec<Key>,
}

impl<T> Clone for NodeTable<T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            roots: self.roots.clone(),
            order: self.order.clone(),
        }
    }
}

impl<T> NodeTable<T> {
    /// Link a draft tree.
    ///
    /// Visit order is depth-first pre-order. `prev_key`/`next_key` chain every
    /// visited node (sections included); `index` counts items only.
    pub fn link(drafts: Vec<Draft<T>>) -> Result<Self> {
        let mut table = Self {
            nodes: AHashMap::new(),
            roots: Vec::with_capacity(drafts.len()),
            order: Vec::new(),
        };
        let mut item_index = 0usize;
        for draft in drafts {
            let key = table.insert(draft, None, 0, &mut item_index)?;
            table.roots.push(key);
        }

        let mut prev: Option<Key> = None;
        for key in table.order.iter() {
            if let Some(prev_key) = &prev {
                if let Some(prev_node) = table.nodes.get_mut(prev_key) {
                    prev_node.next_key = Some(key.clone());
                }
            }
            if let Some(node) = table.nodes.get_mut(key) {
                node.prev_key = prev.clone();
            }
            prev = Some(key.clone());
        }

        Ok(table)
    }

    fn insert(
        &mut self,
        draft: Draft<T>,
        parent_key: Option<Key>,
        level: usize,
        item_index: &mut usize,
    ) -> Result<Key> {
        let key = draft.key;
        if self.nodes.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }

        let index = match draft.node_type {
            NodeType::Item => {
                let index = *item_index;
                *item_index += 1;
                Some(index)
            }
            NodeType::Section => None,
        };

        // Placeholder so pre-order is recorded before the children.
        self.order.push(key.clone());
        self.nodes.insert(
            key.clone(),
            Node {
                key: key.clone(),
                node_type: draft.node_type,
                text_value: draft.text_value,
                value: draft.value,
                child_keys: Vec::new(),
                parent_key,
                level,
                index,
                prev_key: None,
                next_key: None,
            },
        );

        let mut child_keys = Vec::with_capacity(draft.children.len());
        for child in draft.children {
            child_keys.push(self.insert(child, Some(key.clone()), level + 1, item_index)?);
        }
        if let Some(node) = self.nodes.get_mut(&key) {
            node.child_keys = child_keys;
        }

        Ok(key)
    }

    pub fn roots(&self) -> Nodes<'_, T> {
        Nodes {
            keys: self.roots.iter(),
            nodes: &self.nodes,
        }
    }

    pub fn visit_order(&self) -> Nodes<'_, T> {
        Nodes {
            keys: self.order.iter(),
            nodes: &self.nodes,
        }
    }

    pub fn children(&self, key: &Key) -> Nodes<'_, T> {
        match self.nodes.get(key) {
            Some(node) => Nodes {
                keys: node.child_keys.iter(),
                nodes: &self.nodes,
            },
            None => Nodes::empty(&self.nodes),
        }
    }

    pub fn get(&self, key: &Key) -> Option<&Node<T>> {
        self.nodes.get(key)
    }

    pub fn first_key(&self) -> Option<&Key> {
        self.order.first()
    }

    pub fn last_key(&self) -> Option<&Key> {
        self.order.last()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

/// The unfiltered base collection.
#[derive(Debug)]
pub struct ListCollection<T> {
    table: NodeTable<T>,
}

impl<T> Clone for ListCollection<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<T> Default for ListCollection<T> {
    fn default() -> Self {
        Self {
            table: NodeTable {
                nodes: AHashMap::new(),
                roots: Vec::new(),
                order: Vec::new(),
            },
        }
    }
}

impl<T> ListCollection<T> {
    /// Build a collection from an entry tree.
    ///
    /// Fails with `Error::DuplicateKey` when two entries resolve to the same key.
    pub fn from_entries(entries: Vec<Entry<T>>) -> Result<Self> {
        let drafts = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| draft_from_entry(entry, &format!("$.{i}")))
            .collect();
        let table = NodeTable::link(drafts)?;
        tracing::trace!(size = table.len(), "built base collection");
        Ok(Self { table })
    }

    /// Convenience constructor for a flat list of `(key, text)` items.
    pub fn from_items<K, S, I>(items: I) -> Result<Self>
    where
        K: Into<Key>,
        S: Into<String>,
        I: IntoIterator<Item = (K, S)>,
    {
        Self::from_entries(
            items
                .into_iter()
                .map(|(key, text)| Entry::item(key, text))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }
}

fn draft_from_entry<T>(entry: Entry<T>, path: &str) -> Draft<T> {
    match entry {
        Entry::Item { key, text, value } => Draft {
            key: key.unwrap_or_else(|| Key::new(path)),
            node_type: NodeType::Item,
            text_value: text,
            value: value.map(Arc::new),
            children: Vec::new(),
        },
        Entry::Section {
            key,
            title,
            children,
        } => Draft {
            key: key.unwrap_or_else(|| Key::new(path)),
            node_type: NodeType::Section,
            text_value: title,
            value: None,
            children: children
                .into_iter()
                .enumerate()
                .map(|(i, child)| draft_from_entry(child, &format!("{path}.{i}")))
                .collect(),
        },
    }
}

/// Parse a JSON array of entries.
pub fn entries_from_json_str<T>(json: &str) -> Result<Vec<Entry<T>>>
where
    T: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_str(json)?)
}

impl<T> Collection<T> for ListCollection<T> {
    fn iter(&self) -> Nodes<'_, T> {
        self.table.roots()
    }

    fn visit_order(&self) -> Nodes<'_, T> {
        self.table.visit_order()
    }

    fn children(&self, key: &Key) -> Nodes<'_, T> {
        self.table.children(key)
    }

    fn get(&self, key: &Key) -> Option<&Node<T>> {
        self.table.get(key)
    }

    fn first_key(&self) -> Option<&Key> {
        self.table.first_key()
    }

    fn last_key(&self) -> Option<&Key> {
        self.table.last_key()
    }

    fn size(&self) -> usize {
        self.table.len()
    }
}
