//! Combo-box interaction state.
//!
//! `ComboBoxState` ties the pieces together: the value/selection synchronizer,
//! the filtered view of the source collection, the inline suggestion, keyboard
//! focus, and a gate in front of the open/close primitive.
//!
//! Within one action the order is fixed: input value update, selected key
//! recomputation, selection notification, filtered view rebuild, suggestion
//! recomputation. Each stage reads the fully updated result of the previous
//! ones.
//!
//! # Example
//!
//! ```
//! use libcombobox_core::{Collection, ComboBoxProps, ComboBoxState, ListCollection};
//!
//! let items = ListCollection::<()>::from_items([("a", "Apple"), ("b", "Banana")]).unwrap();
//! let mut state = ComboBoxState::new(ComboBoxProps::new(items)).unwrap();
//!
//! state.set_input_value("an");
//! assert_eq!(state.collection().size(), 1);
//!
//! state.set_input_value("Apple");
//! assert_eq!(state.selected_key().map(|k| k.as_str()), Some("a"));
//! ```

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::collator::UnicodeCollator;
use crate::collection::{Collection, ListCollection};
use crate::context::{ComboBoxContext, ContextRow};
use crate::error::Result;
use crate::filter::{FilteredCollection, SubstringFilter, TextFilter};
use crate::node::{Key, Node};
use crate::selection::SelectionManager;
use crate::suggestion;
use crate::synchronizer::{SyncEffects, SyncInit, ValueSynchronizer};
use crate::trigger::{FocusStrategy, MenuTriggerState};
use crate::Config;

type InputCallback = Box<dyn FnMut(&str)>;
type SelectionCallback = Box<dyn FnMut(Option<&Key>)>;
type FilterCallback = Box<dyn FnMut(Option<&str>)>;
type OpenCallback = Box<dyn FnMut(bool)>;

#[derive(Default)]
struct Callbacks {
    on_input_change: Option<InputCallback>,
    on_selection_change: Option<SelectionCallback>,
    on_filter: Option<FilterCallback>,
    on_open_change: Option<OpenCallback>,
}

impl Callbacks {
    fn input_change(&mut self, value: &str) {
        if let Some(handler) = self.on_input_change.as_mut() {
            handler(value);
        }
    }

    fn selection_change(&mut self, key: Option<&Key>) {
        if let Some(handler) = self.on_selection_change.as_mut() {
            handler(key);
        }
    }

    fn filter(&mut self, value: Option<&str>) {
        if let Some(handler) = self.on_filter.as_mut() {
            handler(value);
        }
    }

    fn open_change(&mut self, open: bool) {
        if let Some(handler) = self.on_open_change.as_mut() {
            handler(open);
        }
    }
}

/// Construction parameters for `ComboBoxState`.
pub struct ComboBoxProps<T> {
    collection: ListCollection<T>,
    config: Config,
    sync: SyncInit,
    is_open: Option<bool>,
    default_open: bool,
    filter: Option<Arc<dyn TextFilter>>,
    callbacks: Callbacks,
}

impl<T> ComboBoxProps<T> {
    pub fn new(collection: ListCollection<T>) -> Self {
        Self {
            collection,
            config: Config::default(),
            sync: SyncInit::default(),
            is_open: None,
            default_open: false,
            filter: None,
            callbacks: Callbacks::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Make the input value controlled.
    pub fn with_input_value(mut self, value: impl Into<String>) -> Self {
        self.sync.input_value = Some(value.into());
        self
    }

    pub fn with_default_input_value(mut self, value: impl Into<String>) -> Self {
        self.sync.default_input_value = Some(value.into());
        self
    }

    /// Make the selected key controlled. `None` means "controlled, nothing selected".
    pub fn with_selected_key(mut self, key: Option<Key>) -> Self {
        self.sync.selected_key = Some(key);
        self
    }

    pub fn with_default_selected_key(mut self, key: impl Into<Key>) -> Self {
        self.sync.default_selected_key = Some(key.into());
        self
    }

    /// Make the open state controlled.
    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    pub fn with_default_open(mut self, open: bool) -> Self {
        self.default_open = open;
        self
    }

    /// Replace the default substring predicate.
    pub fn with_filter(mut self, filter: impl TextFilter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn on_input_change(mut self, handler: impl FnMut(&str) + 'static) -> Self {
        self.callbacks.on_input_change = Some(Box::new(handler));
        self
    }

    pub fn on_selection_change(mut self, handler: impl FnMut(Option<&Key>) + 'static) -> Self {
        self.callbacks.on_selection_change = Some(Box::new(handler));
        self
    }

    /// Delegate filtering to the host.
    ///
    /// With a filter callback installed the engine no longer filters the
    /// collection itself. The callback receives the new input text once per
    /// distinct change, and `None` when the menu is asked to open: `None`
    /// means "no new text; refresh using the current one".
    pub fn on_filter(mut self, handler: impl FnMut(Option<&str>) + 'static) -> Self {
        self.callbacks.on_filter = Some(Box::new(handler));
        self
    }

    pub fn on_open_change(mut self, handler: impl FnMut(bool) + 'static) -> Self {
        self.callbacks.on_open_change = Some(Box::new(handler));
        self
    }
}

pub struct ComboBoxState<T> {
    config: Config,
    collator: UnicodeCollator,
    source: ListCollection<T>,
    /// Filtered view; `None` when filtering is bypassed.
    view: Option<Arc<FilteredCollection<T>>>,
    filter: Arc<dyn TextFilter>,
    cache: Option<LruCache<String, Arc<FilteredCollection<T>>>>,
    cache_hits: usize,
    cache_misses: usize,
    sync: ValueSynchronizer,
    selection: SelectionManager,
    trigger: MenuTriggerState,
    is_focused: bool,
    suggested_value: Option<String>,
    /// Last text reported through the filter callback.
    last_filter_value: Option<String>,
    callbacks: Callbacks,
}

impl<T> ComboBoxState<T> {
    /// Build the state.
    ///
    /// Fails with `Error::SelectionMismatch` when a controlled selected key and
    /// a controlled input value disagree.
    pub fn new(props: ComboBoxProps<T>) -> Result<Self> {
        let ComboBoxProps {
            collection,
            config,
            sync,
            is_open,
            default_open,
            filter,
            callbacks,
        } = props;

        let sync = ValueSynchronizer::new(&collection, sync)?;
        let collator = config.collator();
        let filter: Arc<dyn TextFilter> = match filter {
            Some(filter) => filter,
            None => Arc::new(SubstringFilter::new(collator.clone())),
        };
        let cache = NonZeroUsize::new(config.max_cache_size).map(LruCache::new);
        let last_filter_value = Some(sync.input_value().to_string());

        let mut state = Self {
            config,
            collator,
            source: collection,
            view: None,
            filter,
            cache,
            cache_hits: 0,
            cache_misses: 0,
            sync,
            selection: SelectionManager::new(),
            trigger: MenuTriggerState::new(is_open, default_open),
            is_focused: false,
            suggested_value: None,
            last_filter_value,
            callbacks,
        };
        state.refresh();
        tracing::debug!(
            input = state.input_value(),
            selected = ?state.selected_key(),
            "combo box state created"
        );
        Ok(state)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ========== Value / selection ==========

    pub fn input_value(&self) -> &str {
        self.sync.input_value()
    }

    /// Apply a user text edit.
    pub fn set_input_value(&mut self, value: &str) {
        tracing::debug!(value, "input edited");
        let effects = self.sync.edit_text(&self.source, value);
        self.dispatch(effects);
        self.notify_filter(value);
        self.refresh();
    }

    pub fn selected_key(&self) -> Option<&Key> {
        self.sync.selected_key()
    }

    /// The selected item in the unfiltered collection.
    pub fn selected_item(&self) -> Option<&Node<T>> {
        self.selected_key().and_then(|key| self.source.get(key))
    }

    /// Select a key (pointer, Enter, or programmatic).
    pub fn set_selected_key(&mut self, key: Option<Key>) {
        let effects = self.sync.select_key(&self.source, key);
        self.apply_selection_effects(effects);
    }

    /// Push the host's selected-key prop. Acts once per distinct value.
    pub fn sync_selected_key_prop(&mut self, key: Option<Key>) {
        if let Some(effects) = self.sync.sync_selected_key_prop(&self.source, key) {
            self.apply_selection_effects(effects);
        }
    }

    /// Push the host's controlled input value.
    pub fn sync_input_value_prop(&mut self, value: impl Into<String>) {
        if self.sync.sync_input_value_prop(value.into()) {
            self.refresh();
        }
    }

    fn apply_selection_effects(&mut self, effects: SyncEffects) {
        let input_changed = effects.input_changed.clone();
        self.dispatch(effects);
        if let Some(value) = input_changed {
            self.notify_filter(&value);
        }
        self.refresh();
    }

    fn dispatch(&mut self, effects: SyncEffects) {
        if let Some(value) = effects.input_changed {
            self.callbacks.input_change(&value);
        }
        if let Some(key) = effects.selection_changed {
            self.callbacks.selection_change(key.as_ref());
        }
    }

    fn notify_filter(&mut self, value: &str) {
        if !self.is_filter_delegated() || self.last_filter_value.as_deref() == Some(value) {
            return;
        }
        self.last_filter_value = Some(value.to_string());
        self.callbacks.filter(Some(value));
    }

    /// Whether filtering is left to the host through the filter callback.
    pub fn is_filter_delegated(&self) -> bool {
        self.callbacks.on_filter.is_some()
    }

    // ========== Collections ==========

    /// The filtered view (or the source when filtering is bypassed).
    pub fn collection(&self) -> &dyn Collection<T> {
        match &self.view {
            Some(view) => view.as_ref(),
            None => &self.source,
        }
    }

    /// The unfiltered source collection.
    pub fn source_collection(&self) -> &ListCollection<T> {
        &self.source
    }

    /// Replace the source collection. Input and selection are kept.
    pub fn set_collection(&mut self, collection: ListCollection<T>) {
        self.source = collection;
        self.clear_cache();
        self.refresh();
    }

    /// Replace the matching predicate.
    pub fn set_filter(&mut self, filter: impl TextFilter + 'static) {
        self.filter = Arc::new(filter);
        self.clear_cache();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.rebuild_view();
        // Focus never points at a row the view no longer shows
        let stale = self
            .selection
            .focused_key()
            .is_some_and(|key| self.collection().get(key).is_none());
        if stale {
            tracing::trace!("focused key left the view");
            self.selection.set_focused_key(None);
        }
        self.update_suggestion();
    }

    fn rebuild_view(&mut self) {
        let query = self.sync.input_value();
        if self.is_filter_delegated() || query.is_empty() {
            self.view = None;
            return;
        }

        if let Some(view) = self.cache.as_mut().and_then(|cache| cache.get(query)) {
            let view = view.clone();
            self.cache_hits += 1;
            tracing::trace!(query, "filtered view cache hit");
            self.view = Some(view);
            return;
        }

        self.cache_misses += 1;
        let query = query.to_string();
        let view = Arc::new(FilteredCollection::with_text_filter(
            &self.source,
            self.filter.as_ref(),
            &query,
        ));
        if let Some(cache) = self.cache.as_mut() {
            cache.put(query, view.clone());
        }
        self.view = Some(view);
    }

    fn update_suggestion(&mut self) {
        let suggested = suggestion::suggest(
            self.collection(),
            self.sync.input_value(),
            self.selection.focused_key(),
            self.config.allows_custom_value,
            &self.collator,
        );
        self.suggested_value = suggested;
    }

    pub fn suggested_value(&self) -> Option<&str> {
        self.suggested_value.as_deref()
    }

    /// Apply the current suggestion as if the user typed it.
    /// Returns false when there is no suggestion.
    pub fn accept_suggestion(&mut self) -> bool {
        let Some(suggestion) = self.suggested_value.clone() else {
            return false;
        };
        self.set_input_value(&suggestion);
        true
    }

    // ========== Open / close gate ==========

    /// Effective open state: requested open and the input has focus.
    pub fn is_open(&self) -> bool {
        self.trigger.is_open() && self.is_focused
    }

    /// Open the menu if the filtered view has items.
    ///
    /// The filter callback fires with `None` whether or not the menu opens.
    pub fn open(&mut self, focus_strategy: Option<FocusStrategy>) {
        if self.is_filter_delegated() {
            self.callbacks.filter(None);
        }
        if !self.collection().has_items() {
            tracing::debug!("open request dropped: no items to show");
            return;
        }
        if self.trigger.open(focus_strategy) {
            self.callbacks.open_change(true);
        }
        self.apply_focus_strategy(focus_strategy);
    }

    /// Closing is never gated.
    pub fn close(&mut self) {
        if self.trigger.close() {
            self.callbacks.open_change(false);
        }
    }

    pub fn set_open(&mut self, open: bool) {
        if !open {
            self.close();
            return;
        }
        if self.is_filter_delegated() {
            self.callbacks.filter(None);
        }
        if !self.collection().has_items() {
            tracing::debug!("set_open(true) dropped: no items to show");
            return;
        }
        if self.trigger.set_open(true) {
            self.callbacks.open_change(true);
        }
    }

    /// Open the menu when it is closed and the filtered view has items.
    pub fn toggle(&mut self, focus_strategy: Option<FocusStrategy>) {
        if self.trigger.is_open() || !self.collection().has_items() {
            tracing::debug!(open = self.trigger.is_open(), "toggle request dropped");
            return;
        }
        if self.trigger.toggle(focus_strategy) {
            self.callbacks.open_change(true);
        }
        self.apply_focus_strategy(focus_strategy);
    }

    /// Push the host's controlled open state.
    pub fn sync_open_prop(&mut self, is_open: bool) {
        self.trigger.sync(is_open);
    }

    fn apply_focus_strategy(&mut self, focus_strategy: Option<FocusStrategy>) {
        let view = self.view.clone();
        let collection: &dyn Collection<T> = match &view {
            Some(view) => view.as_ref(),
            None => &self.source,
        };
        let changed = match focus_strategy {
            Some(FocusStrategy::First) => self.selection.focus_first(collection),
            Some(FocusStrategy::Last) => self.selection.focus_last(collection),
            None => false,
        };
        if changed {
            self.update_suggestion();
        }
    }

    // ========== Input focus ==========

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    /// Record input focus. Losing focus closes the menu when
    /// `should_close_on_blur` is set.
    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
        if !focused && self.config.should_close_on_blur {
            self.close();
        }
    }

    // ========== Keyboard focus ==========

    pub fn focused_key(&self) -> Option<&Key> {
        self.selection.focused_key()
    }

    pub fn selection_manager(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn set_focused_key(&mut self, key: Option<Key>) {
        if self.selection.set_focused_key(key) {
            self.update_suggestion();
        }
    }

    pub fn focus_next(&mut self) -> bool {
        let view = self.view.clone();
        let moved = match &view {
            Some(view) => self.selection.focus_next(view.as_ref()),
            None => self.selection.focus_next(&self.source),
        };
        if moved {
            self.update_suggestion();
        }
        moved
    }

    pub fn focus_previous(&mut self) -> bool {
        let view = self.view.clone();
        let moved = match &view {
            Some(view) => self.selection.focus_previous(view.as_ref()),
            None => self.selection.focus_previous(&self.source),
        };
        if moved {
            self.update_suggestion();
        }
        moved
    }

    /// Commit the focused item (Enter or pointer) and close the menu.
    /// Returns false when no item is focused.
    pub fn select_focused_item(&mut self) -> bool {
        let Some(key) = self
            .focused_key()
            .filter(|key| self.collection().get(key).is_some_and(|node| node.is_item()))
            .cloned()
        else {
            return false;
        };
        self.set_selected_key(Some(key));
        self.close();
        true
    }

    // ========== Snapshot ==========

    pub fn context(&self) -> ComboBoxContext {
        let focused = self.focused_key();
        let selected = self.selected_key();
        let rows = self
            .collection()
            .visit_order()
            .map(|node| ContextRow {
                key: node.key.clone(),
                text: node.text_value.clone(),
                level: node.level,
                is_section: node.is_section(),
                is_focused: Some(&node.key) == focused,
                is_selected: Some(&node.key) == selected,
            })
            .collect();

        ComboBoxContext {
            input_value: self.input_value().to_string(),
            selected_key: selected.cloned(),
            suggested_value: self.suggested_value.clone(),
            is_open: self.is_open(),
            focused_key: focused.cloned(),
            rows,
        }
    }

    // ========== Cache ==========

    /// Cache statistics as `(hits, misses)`.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache_hits, self.cache_misses)
    }

    /// Hit rate as a percentage, `None` before any lookup.
    pub fn cache_hit_rate(&self) -> Option<f32> {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            None
        } else {
            Some((self.cache_hits as f32 / total as f32) * 100.0)
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.len())
    }

    /// Drop cached views and reset statistics.
    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
        self.cache_hits = 0;
        self.cache_misses = 0;
    }
}
