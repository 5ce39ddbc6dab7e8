// core/tests/selection_sync.rs
//
// Integration tests for keeping the input text and the selected key in step.
//
// Tests cover:
// - Selecting a key writes the item's text into the input
// - Typing an item's exact text selects it; anything else clears the selection
// - Callback order within one action
// - Controlled selected key / input value props and echo suppression
// - The construction-time mismatch error

use libcombobox_core::{
    Collection, ComboBoxProps, ComboBoxState, Entry, Error, Key, ListCollection,
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

type Log = Rc<RefCell<Vec<String>>>;

/// Props that append every input/selection/filter callback to one log.
fn logged_props(log: &Log) -> ComboBoxProps<()> {
    let input_log = log.clone();
    let selection_log = log.clone();
    ComboBoxProps::new(produce())
        .on_input_change(move |value| input_log.borrow_mut().push(format!("input:{value}")))
        .on_selection_change(move |key| {
            let key = key.map(Key::as_str).unwrap_or("none");
            selection_log.borrow_mut().push(format!("selection:{key}"));
        })
}

#[test]
fn test_select_key_writes_item_text() {
    let log = Log::default();
    let mut state = ComboBoxState::new(logged_props(&log)).unwrap();

    state.set_selected_key(Some(Key::from("apple")));

    assert_eq!(state.input_value(), "Apple");
    assert_eq!(state.selected_key(), Some(&Key::from("apple")));
    assert_eq!(*log.borrow(), vec!["input:Apple", "selection:apple"]);
}

#[test]
fn test_typing_exact_text_selects_item() {
    let log = Log::default();
    let mut state = ComboBoxState::new(logged_props(&log)).unwrap();

    state.set_input_value("Appl");
    assert!(state.selected_key().is_none());

    state.set_input_value("Apple");
    assert_eq!(state.selected_key(), Some(&Key::from("apple")));
    assert_eq!(
        *log.borrow(),
        vec!["input:Appl", "input:Apple", "selection:apple"]
    );
}

#[test]
fn test_typing_non_matching_text_clears_selection() {
    let log = Log::default();
    let mut state = ComboBoxState::new(logged_props(&log)).unwrap();

    state.set_input_value("Apple");
    state.set_input_value("Applz");

    assert!(state.selected_key().is_none());
    assert_eq!(log.borrow().last().map(String::as_str), Some("selection:none"));
}

#[test]
fn test_exact_match_is_case_sensitive() {
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce())).unwrap();
    state.set_input_value("apple");
    assert!(state.selected_key().is_none());
    // The fuzzy view still shows it
    assert!(state.collection().get(&Key::from("apple")).is_some());
}

#[test]
fn test_stale_key_clears_input() {
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce())).unwrap();
    state.set_selected_key(Some(Key::from("banana")));
    state.set_selected_key(Some(Key::from("durian")));

    assert_eq!(state.input_value(), "");
    assert!(state.selected_key().is_none());
}

#[test]
fn test_selecting_section_is_no_selection() {
    let mut state = ComboBoxState::new(ComboBoxProps::new(produce())).unwrap();
    state.set_selected_key(Some(Key::from("fruits")));
    assert!(state.selected_key().is_none());
    assert_eq!(state.input_value(), "");
}

#[test]
fn test_callback_order_with_filter_delegation() {
    let log = Log::default();
    let filter_log = log.clone();
    let props = logged_props(&log).on_filter(move |value| {
        filter_log
            .borrow_mut()
            .push(format!("filter:{}", value.unwrap_or("<none>")));
    });
    let mut state = ComboBoxState::new(props).unwrap();

    state.set_input_value("Apple");

    assert_eq!(
        *log.borrow(),
        vec!["input:Apple", "selection:apple", "filter:Apple"]
    );
}

#[test]
fn test_default_selected_key_sets_initial_text() {
    let props = ComboBoxProps::new(produce()).with_default_selected_key("cherry");
    let state = ComboBoxState::new(props).unwrap();
    assert_eq!(state.input_value(), "Cherry");
    assert_eq!(state.selected_item().map(|n| n.text_value.as_str()), Some("Cherry"));
}

#[test]
fn test_mismatched_controlled_props_fail() {
    let props = ComboBoxProps::new(produce())
        .with_selected_key(Some(Key::from("apple")))
        .with_input_value("Banana");

    let err = ComboBoxState::new(props).err().expect("mismatch must fail");
    assert!(err.is_configuration());
    assert!(matches!(err, Error::SelectionMismatch { ref key, .. } if key.as_str() == "apple"));
}

#[test]
fn test_matching_controlled_props_succeed() {
    let props = ComboBoxProps::new(produce())
        .with_selected_key(Some(Key::from("apple")))
        .with_input_value("Apple");
    let state = ComboBoxState::new(props).unwrap();
    assert_eq!(state.selected_key(), Some(&Key::from("apple")));
}

#[test]
fn test_controlled_selection_waits_for_host() {
    let log = Log::default();
    let props = logged_props(&log).with_selected_key(None);
    let mut state = ComboBoxState::new(props).unwrap();

    state.set_selected_key(Some(Key::from("banana")));
    // Notified, but the host owns the key
    assert!(state.selected_key().is_none());
    assert_eq!(log.borrow().last().map(String::as_str), Some("selection:banana"));

    log.borrow_mut().clear();
    state.sync_selected_key_prop(Some(Key::from("banana")));
    assert_eq!(state.selected_key(), Some(&Key::from("banana")));
    assert_eq!(state.input_value(), "Banana");
    // The echoed prop does not notify again
    assert!(log.borrow().is_empty());
}

#[test]
fn test_selected_key_prop_applies_once_per_value() {
    let log = Log::default();
    let props = logged_props(&log).with_selected_key(None);
    let mut state = ComboBoxState::new(props).unwrap();

    state.sync_selected_key_prop(Some(Key::from("carrot")));
    assert_eq!(state.input_value(), "Carrot");
    assert_eq!(state.selected_key(), Some(&Key::from("carrot")));
    // The host's own key is not reported back to it
    assert_eq!(*log.borrow(), vec!["input:Carrot".to_string()]);

    // User edits the text; re-rendering with the same prop must not restore it
    state.set_input_value("Carr");
    state.sync_selected_key_prop(Some(Key::from("carrot")));
    assert_eq!(state.input_value(), "Carr");
}

#[test]
fn test_controlled_input_value() {
    let log = Log::default();
    let props = logged_props(&log).with_input_value("");
    let mut state = ComboBoxState::new(props).unwrap();

    state.set_input_value("Ch");
    assert_eq!(state.input_value(), "");
    assert_eq!(log.borrow().first().map(String::as_str), Some("input:Ch"));

    state.sync_input_value_prop("Ch");
    assert_eq!(state.input_value(), "Ch");
    assert_eq!(state.collection().items().count(), 1);
}
