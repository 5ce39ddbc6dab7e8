//! Open/close state of the popup menu.
//!
//! This is the ungated primitive: it honors every request. The combo-box
//! decides which requests reach it.

use serde::{Deserialize, Serialize};

use crate::controlled::ControlledState;

/// Which item receives keyboard focus when the menu opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusStrategy {
    First,
    Last,
}

#[derive(Debug, Clone)]
pub struct MenuTriggerState {
    open: ControlledState<bool>,
    focus_strategy: Option<FocusStrategy>,
}

impl MenuTriggerState {
    /// `is_open` makes the state controlled; otherwise it starts at `default_open`.
    pub fn new(is_open: Option<bool>, default_open: bool) -> Self {
        Self {
            open: ControlledState::new(is_open, default_open),
            focus_strategy: None,
        }
    }

    pub fn is_open(&self) -> bool {
        *self.open.get()
    }

    pub fn is_controlled(&self) -> bool {
        self.open.is_controlled()
    }

    /// Focus strategy requested by the most recent `open`/`toggle`.
    pub fn focus_strategy(&self) -> Option<FocusStrategy> {
        self.focus_strategy
    }

    /// Request opening. Returns true when the open state should be reported
    /// as changed.
    pub fn open(&mut self, focus_strategy: Option<FocusStrategy>) -> bool {
        self.focus_strategy = focus_strategy;
        self.open.request(true)
    }

    pub fn close(&mut self) -> bool {
        self.open.request(false)
    }

    pub fn set_open(&mut self, open: bool) -> bool {
        if open {
            self.open(None)
        } else {
            self.close()
        }
    }

    pub fn toggle(&mut self, focus_strategy: Option<FocusStrategy>) -> bool {
        if self.is_open() {
            self.close()
        } else {
            self.open(focus_strategy)
        }
    }

    /// Host-side update of a controlled open state.
    pub fn sync(&mut self, is_open: bool) -> bool {
        self.open.sync(is_open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncontrolled_open_close() {
        let mut t = MenuTriggerState::new(None, false);
        assert!(t.open(Some(FocusStrategy::Last)));
        assert!(t.is_open());
        assert_eq!(t.focus_strategy(), Some(FocusStrategy::Last));
        assert!(!t.open(None));
        assert!(t.toggle(None));
        assert!(!t.is_open());
    }

    #[test]
    fn test_controlled_reports_without_changing() {
        let mut t = MenuTriggerState::new(Some(false), true);
        assert!(t.is_controlled());
        assert!(!t.is_open());
        assert!(t.set_open(true));
        assert!(!t.is_open());
        assert!(t.sync(true));
        assert!(t.is_open());
    }
}
