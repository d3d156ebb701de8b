#![forbid(unsafe_code)]

//! Localized strings for the tutorial examples.
//!
//! Provides key-based string lookup with a locale fallback chain, plural
//! forms selected per locale, and `{name}` interpolation.

pub mod catalog;
pub mod plural;

pub use catalog::{I18nError, Locale, LocaleStrings, StringCatalog, StringEntry};
pub use plural::{PluralCategory, PluralForms, PluralRule};
