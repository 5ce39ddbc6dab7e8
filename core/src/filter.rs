//! Structure-preserving filtering of collections.
//!
//! A filtered view never mutates its source. Items that pass the predicate
//! are copied into a fresh node set, sections are copied with their filtered
//! children, and sections left without children are dropped. Traversal links
//! and item indices are recomputed over the new tree.

use crate::collator::{Collator, UnicodeCollator};
use crate::collection::{Collection, Draft, NodeTable, Nodes};
use crate::node::{Key, Node, NodeType};

/// Decides whether an item's text matches the current input.
///
/// Implemented for `Fn(&str, &str) -> bool` closures taking
/// `(item_text, query)`.
pub trait TextFilter {
    fn matches(&self, text: &str, query: &str) -> bool;
}

impl<F> TextFilter for F
where
    F: Fn(&str, &str) -> bool,
{
    fn matches(&self, text: &str, query: &str) -> bool {
        self(text, query)
    }
}

/// Default predicate: collator-equal substring search.
///
/// Both sides are lowercased and stripped of the ASCII space character
/// (U+0020 only; tabs and other separators are kept). Every window of the
/// item text with the query's length is compared to the query with the
/// collator. An empty query matches everything.
#[derive(Debug, Clone, Default)]
pub struct SubstringFilter<C = UnicodeCollator> {
    collator: C,
}

impl<C: Collator> SubstringFilter<C> {
    pub fn new(collator: C) -> Self {
        Self { collator }
    }

    pub fn collator(&self) -> &C {
        &self.collator
    }
}

/// Lowercase and drop literal spaces.
pub(crate) fn squash(s: &str) -> Vec<char> {
    s.chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

impl<C: Collator> TextFilter for SubstringFilter<C> {
    fn matches(&self, text: &str, query: &str) -> bool {
        let query: String = squash(query).into_iter().collect();
        let query_len = query.chars().count();
        if query_len == 0 {
            return true;
        }
        let text = squash(text);
        if query_len > text.len() {
            return false;
        }
        text.windows(query_len).any(|window| {
            let window: String = window.iter().collect();
            self.collator.equals(&query, &window)
        })
    }
}

/// A collection holding only the items that passed a predicate.
#[derive(Debug)]
pub struct FilteredCollection<T> {
    table: NodeTable<T>,
}

impl<T> Clone for FilteredCollection<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<T> FilteredCollection<T> {
    /// Filter `source` with a predicate over item nodes.
    pub fn new<P>(source: &dyn Collection<T>, predicate: P) -> Self
    where
        P: Fn(&Node<T>) -> bool,
    {
        let drafts = filter_level(source, source.iter(), &predicate);
        // Keys come from a collection that already guarantees uniqueness.
        let table = match NodeTable::link(drafts) {
            Ok(table) => table,
            Err(err) => unreachable!("filtered view repeated a source key: {err}"),
        };
        tracing::trace!(
            source_size = source.size(),
            filtered_size = table.len(),
            "built filtered collection"
        );
        Self { table }
    }

    /// Filter `source` by matching item text against `query`.
    pub fn with_text_filter(
        source: &dyn Collection<T>,
        filter: &dyn TextFilter,
        query: &str,
    ) -> Self {
        Self::new(source, |node| filter.matches(&node.text_value, query))
    }
}

fn filter_level<'a, T, P>(
    source: &'a dyn Collection<T>,
    nodes: Nodes<'a, T>,
    predicate: &P,
) -> Vec<Draft<T>>
where
    P: Fn(&Node<T>) -> bool,
{
    let mut out = Vec::new();
    for node in nodes {
        match node.node_type {
            NodeType::Section => {
                let children = filter_level(source, source.children(&node.key), predicate);
                if !children.is_empty() {
                    let mut section = Draft::detached(node);
                    section.children = children;
                    out.push(section);
                }
            }
            NodeType::Item => {
                if predicate(node) {
                    out.push(Draft::detached(node));
                }
            }
        }
    }
    out
}

impl<T> Collection<T> for FilteredCollection<T> {
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
