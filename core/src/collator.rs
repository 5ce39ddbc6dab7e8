//! Locale-aware string equality.
//!
//! The engine only ever asks a collator whether two strings are equal at a
//! given strength; it never sorts. `UnicodeCollator` implements the strengths
//! by folding both sides (canonical decomposition, optional removal of
//! combining marks, optional lowercasing) and comparing the folded forms.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Comparison strength, mirroring the usual collator sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Base letters only: `a = á = A`
    #[default]
    Base,
    /// Accents matter, case does not: `a ≠ á`, `a = A`
    Accent,
    /// Case matters, accents do not: `a ≠ A`, `a = á`
    Case,
    /// Everything matters (after canonical normalization)
    Variant,
}

/// String equality used for matching and suggestions.
pub trait Collator {
    fn equals(&self, a: &str, b: &str) -> bool;
}

impl<F> Collator for F
where
    F: Fn(&str, &str) -> bool,
{
    fn equals(&self, a: &str, b: &str) -> bool {
        self(a, b)
    }
}

/// Collator built on Unicode normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeCollator {
    locale: String,
    sensitivity: Sensitivity,
}

impl UnicodeCollator {
    pub fn new(locale: impl Into<String>, sensitivity: Sensitivity) -> Self {
        Self {
            locale: locale.into(),
            sensitivity,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Fold a string to the form compared at this collator's strength.
    pub fn fold(&self, s: &str) -> String {
        let strip_marks = matches!(self.sensitivity, Sensitivity::Base | Sensitivity::Case);
        let lowercase = matches!(self.sensitivity, Sensitivity::Base | Sensitivity::Accent);

        let decomposed = s.nfd().filter(|c| !(strip_marks && is_combining_mark(*c)));
        if lowercase {
            decomposed.flat_map(char::to_lowercase).collect()
        } else {
            decomposed.collect()
        }
    }
}

impl Default for UnicodeCollator {
    fn default() -> Self {
        Self::new("en-US", Sensitivity::Base)
    }
}

impl Collator for UnicodeCollator {
    fn equals(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        self.fold(a) == self.fold(b)
    }
}
