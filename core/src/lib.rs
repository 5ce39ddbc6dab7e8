//! libcombobox-core
//!
//! Interaction state for a combo box: a text input paired with a filterable
//! popup list. The crate renders nothing; a host feeds it user actions and
//! prop updates, dispatches the callbacks it fires, and paints from
//! [`ComboBoxContext`].
//!
//! Public API:
//! - `ComboBoxState` - The state machine (input, selection, filtering, open gate)
//! - `ComboBoxProps` - Construction parameters and callbacks
//! - `ListCollection` / `Collection` - Keyed, ordered, possibly sectioned items
//! - `FilteredCollection` - A structure-preserving filtered view
//! - `ValueSynchronizer` - Keeps input text and selected key consistent
//! - `UnicodeCollator` - Locale-aware string equality
//! - `Config` - Behavior flags, loadable from TOML
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod node;
pub use node::{Entry, Key, Node, NodeType};

pub mod collection;
pub use collection::{entries_from_json_str, Collection, Items, ListCollection, Nodes};

pub mod collator;
pub use collator::{Collator, Sensitivity, UnicodeCollator};

pub mod filter;
pub use filter::{FilteredCollection, SubstringFilter, TextFilter};

pub mod controlled;
pub use controlled::ControlledState;

pub mod selection;
pub use selection::SelectionManager;

pub mod trigger;
pub use trigger::{FocusStrategy, MenuTriggerState};

pub mod synchronizer;
pub use synchronizer::{SyncEffects, SyncInit, ValueSynchronizer};

pub mod suggestion;

pub mod context;
pub use context::{ComboBoxContext, ContextRow};

pub mod combobox;
pub use combobox::{ComboBoxProps, ComboBoxState};

/// Behavior configuration for a combo box.
///
/// Missing fields in a TOML document take their default values.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Locale used for text comparison (BCP 47 tag)
    pub locale: String,

    /// Which differences the collator treats as significant
    pub sensitivity: Sensitivity,

    /// Typed text may stand on its own without matching an item.
    /// Disables the inline suggestion.
    pub allows_custom_value: bool,

    /// Close the popup when the input loses focus
    pub should_close_on_blur: bool,

    // Cache Management
    /// Maximum number of filtered views kept, keyed by query (0 disables caching)
    pub max_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            // Base: case- and accent-insensitive
            sensitivity: Sensitivity::Base,
            allows_custom_value: false,
            should_close_on_blur: true,
            max_cache_size: 64,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| Error::io(path, e))
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A collator built from `locale` and `sensitivity`.
    pub fn collator(&self) -> UnicodeCollator {
        UnicodeCollator::new(self.locale.clone(), self.sensitivity)
    }
}
