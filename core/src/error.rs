//! Error types for combo-box state construction and loading.

use std::path::PathBuf;

use crate::node::Key;

/// Result type alias for combo-box operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by this crate.
///
/// Interaction requests (open, toggle, typing, focus moves) never fail; they
/// either take effect or are dropped. Only construction and loading return
/// errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Both a controlled selected key and a controlled input value were given
    /// and the selected item's text does not equal the input value.
    #[error(
        "selected key '{key}' has text {item_text:?} but the input value is {input_value:?}"
    )]
    SelectionMismatch {
        key: Key,
        /// `None` when the key is not present in the collection.
        item_text: Option<String>,
        input_value: String,
    },

    /// Two nodes of a base collection share the same key.
    #[error("duplicate collection key '{0}'")]
    DuplicateKey(Key),

    /// File I/O error while loading config or entries.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is a caller configuration error (as opposed to a loading failure).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::SelectionMismatch { .. } | Self::DuplicateKey(_))
    }
}
