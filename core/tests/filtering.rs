// core/tests/filtering.rs
//
// Integration tests for the filtered view.
//
// Tests cover:
// - Sections survive only with matching items; links and indices are rebuilt
// - An always-true predicate keeps every key in order
// - The default predicate (case/accent folding, literal spaces ignored)
// - Host-delegated filtering and the filter callback contract
// - Filtered-view cache statistics and invalidation

use libcombobox_core::{
    Collection, ComboBoxProps, ComboBoxState, Config, Entry, FilteredCollection, Key,
    ListCollection,
};
use std::cell::RefCell;
use std::rc::Rc;

fn produce() -> ListCollection<()> {
    ListCollection::from_entries(vec![
        Entry::section(
            "fruits",
            "Fruits",
            vec![
                Entry::item("apple", "Apple"),
                Entry::item("banana", "Banana"),
                Entry::item("cherry", "Cherry"),
            ],
        ),
        Entry::section(
            "vegetables",
            "Vegetables",
            vec![Entry::item("carrot", "Carrot"), Entry::item("celery", "Celery")],
        ),
    ])
    .expect("valid collection")
}

fn keys(collection: &dyn Collection<()>) -> Vec<String> {
    collection
        .visit_order()
        .map(|node| node.key.as_str().to_string())
        .collect()
}

#[test]
fn test_empty_sections_are_dropped() {
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce())).unwrap();
    state.set_input_value("an");

    assert_eq!(keys(state.collection()), vec!["fruits", "banana"]);
    assert_eq!(state.collection().size(), 2);
}

#[test]
fn test_filtered_links_and_indices() {
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce())).unwrap();
    state.set_input_value("c");

    let view = state.collection();
    assert_eq!(
        keys(view),
        vec!["fruits", "cherry", "vegetables", "carrot", "celery"]
    );

    // Links chain through sections, indices count items only
    assert_eq!(view.key_after(&Key::from("cherry")), Some(&Key::from("vegetables")));
    assert_eq!(view.key_before(&Key::from("carrot")), Some(&Key::from("vegetables")));
    assert_eq!(view.get(&Key::from("cherry")).and_then(|n| n.index), Some(0));
    assert_eq!(view.get(&Key::from("carrot")).and_then(|n| n.index), Some(1));
    assert_eq!(view.first_key(), Some(&Key::from("fruits")));
    assert_eq!(view.last_key(), Some(&Key::from("celery")));

    // The source is untouched
    let source = state.source_collection();
    assert_eq!(source.size(), 7);
    assert_eq!(source.get(&Key::from("carrot")).and_then(|n| n.index), Some(3));
}

#[test]
fn test_every_result_item_matches_and_every_section_has_items() {
    let source = produce();
    let predicate = |text: &str| text.contains('e');
    let view = FilteredCollection::new(&source, |node| predicate(&node.text_value));

    for node in view.visit_order() {
        if node.is_item() {
            assert!(predicate(&node.text_value), "{} should match", node.text_value);
        } else {
            assert!(view.children(&node.key).any(|child| child.is_item()));
        }
    }
}

#[test]
fn test_always_true_predicate_keeps_everything() {
    let source = produce();
    let view = FilteredCollection::new(&source, |_| true);
    assert_eq!(keys(&view), keys(&source));
    assert_eq!(view.size(), source.size());
}

#[test]
fn test_empty_input_bypasses_filter() {
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce())).unwrap();
    state.set_input_value("ch");
    state.set_input_value("");
    assert_eq!(keys(state.collection()), keys(state.source_collection()));
}

#[test]
fn test_default_predicate_folding() {
    let items = ListCollection::<()>::from_items([
        ("creme", "Crème brûlée"),
        ("one", "Item One"),
        ("tab", "Tab\tSeparated"),
    ])
    .unwrap();
    let mut state = ComboBoxState::new(ComboBoxProps::new(items)).unwrap();

    state.set_input_value("CREME");
    assert_eq!(keys(state.collection()), vec!["creme"]);

    // Literal spaces are ignored on both sides
    state.set_input_value("em On");
    assert_eq!(keys(state.collection()), vec!["one"]);

    // Other whitespace is not
    state.set_input_value("tabseparated");
    assert!(keys(state.collection()).is_empty());
}

#[test]
fn test_accent_sensitivity_from_config() {
    let items = ListCollection::<()>::from_items([("creme", "Crème")]).unwrap();
    let config = Config::from_toml_str("sensitivity = \"accent\"").unwrap();
    let mut state = ComboBoxState::new(ComboBoxProps::new(items).with_config(config)).unwrap();

    state.set_input_value("creme");
    assert!(!state.collection().has_items());
    state.set_input_value("CRÈME");
    assert!(state.collection().has_items());
}

#[test]
fn test_custom_predicate() {
    let props = ComboBoxProps::new(produce())
        .with_filter(|text: &str, query: &str| text.starts_with(query));
    let mut state = ComboBoxState::new(props).unwrap();

    state.set_input_value("Ch");
    assert_eq!(keys(state.collection()), vec!["fruits", "cherry"]);
    state.set_input_value("ch");
    assert!(!state.collection().has_items());
}

#[test]
fn test_delegated_filter_fires_once_per_distinct_value() {
    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
    let sink = seen.clone();
    let props = ComboBoxProps::new(produce())
        .on_filter(move |value| sink.borrow_mut().push(value.map(str::to_string)));
    let mut state = ComboBoxState::new(props).unwrap();
    assert!(state.is_filter_delegated());

    state.set_input_value("a");
    state.set_input_value("a");
    state.set_input_value("ap");

    assert_eq!(
        *seen.borrow(),
        vec![Some("a".to_string()), Some("ap".to_string())]
    );
    // The host filters; the engine shows the source as given
    assert_eq!(state.collection().size(), 7);
}

#[test]
fn test_open_signals_refresh_even_when_dropped() {
    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
    let sink = seen.clone();
    let props = ComboBoxProps::new(ListCollection::<()>::default())
        .on_filter(move |value| sink.borrow_mut().push(value.map(str::to_string)));
    let mut state = ComboBoxState::new(props).unwrap();
    state.set_focused(true);

    state.open(None);

    assert!(!state.is_open());
    assert_eq!(*seen.borrow(), vec![None]);
}

#[test]
fn test_set_open_signals_refresh_like_open() {
    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
    let sink = seen.clone();
    let props = ComboBoxProps::new(produce())
        .on_filter(move |value| sink.borrow_mut().push(value.map(str::to_string)));
    let mut state = ComboBoxState::new(props).unwrap();
    state.set_focused(true);

    state.set_open(true);
    assert!(state.is_open());
    assert_eq!(*seen.borrow(), vec![None]);

    // Closing asks for nothing
    state.set_open(false);
    assert_eq!(*seen.borrow(), vec![None]);

    // Dropped requests still ask the host to refresh
    state.set_collection(ListCollection::default());
    state.set_open(true);
    assert!(!state.is_open());
    assert_eq!(*seen.borrow(), vec![None, None]);
}

#[test]
fn test_cache_reuses_views() {
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce())).unwrap();
    assert_eq!(state.cache_hit_rate(), None);

    state.set_input_value("c");
    state.set_input_value("ca");
    state.set_input_value("c");

    assert_eq!(state.cache_stats(), (1, 2));
    assert_eq!(state.cache_size(), 2);
    let rate = state.cache_hit_rate().unwrap();
    assert!((rate - 33.333).abs() < 0.01);

    state.clear_cache();
    assert_eq!(state.cache_stats(), (0, 0));
    assert_eq!(state.cache_size(), 0);
}

#[test]
fn test_cache_capacity_and_disable() {
    let config = Config {
        max_cache_size: 1,
        ..Config::default()
    };
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce()).with_config(config)).unwrap();
    state.set_input_value("c");
    state.set_input_value("ca");
    state.set_input_value("c");
    assert_eq!(state.cache_stats(), (0, 3));
    assert_eq!(state.cache_size(), 1);

    let config = Config {
        max_cache_size: 0,
        ..Config::default()
    };
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce()).with_config(config)).unwrap();
    state.set_input_value("c");
    state.set_input_value("c ");
    assert_eq!(state.cache_size(), 0);
    assert_eq!(state.cache_stats(), (0, 2));
}

#[test]
fn test_set_collection_rebuilds_view() {
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce())).unwrap();
    state.set_input_value("c");
    state.set_input_value("ca");
    assert_eq!(state.cache_size(), 2);

    let more = ListCollection::from_items([("carob", "Carob"), ("cashew", "Cashew")]).unwrap();
    state.set_collection(more);

    assert_eq!(keys(state.collection()), vec!["carob", "cashew"]);
    assert_eq!(state.cache_size(), 1);
    assert_eq!(state.cache_stats(), (0, 1));
    assert_eq!(state.input_value(), "ca");
}
