//! Values that may be owned by the engine or by the host.
//!
//! An uncontrolled value is stored as soon as a change is requested. A
//! controlled value only changes when the host pushes it back with `sync`;
//! requests still report whether the host should be notified.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlledState<T> {
    value: T,
    controlled: bool,
}

impl<T: Clone + PartialEq> ControlledState<T> {
    /// Controlled when `prop` is given, otherwise starts from `default`.
    pub fn new(prop: Option<T>, default: T) -> Self {
        match prop {
            Some(value) => Self::controlled(value),
            None => Self::uncontrolled(default),
        }
    }

    pub fn controlled(value: T) -> Self {
        Self {
            value,
            controlled: true,
        }
    }

    pub fn uncontrolled(value: T) -> Self {
        Self {
            value,
            controlled: false,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Request a new value.
    ///
    /// Returns true when the value differs from the current one, i.e. when
    /// the change callback should fire.
    pub fn request(&mut self, value: T) -> bool {
        let changed = self.value != value;
        if changed && !self.controlled {
            self.value = value;
        }
        changed
    }

    /// Host-side update of a controlled value. Returns true on change.
    pub fn sync(&mut self, value: T) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }
}
