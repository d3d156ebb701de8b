//! Plural categories and the per-locale rules that pick them.
//!
//! Only the two categories the tutorial strings need are modelled. A locale
//! without a dedicated rule uses [`PluralRule::English`].

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    One,
    Other,
}

/// Plural forms for one key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluralForms {
    /// Form for [`PluralCategory::One`]. Empty means "use `other`".
    pub one: String,
    /// Form for everything else.
    pub other: String,
}

impl PluralForms {
    /// Build both forms at once.
    #[must_use]
    pub fn new(one: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            one: one.into(),
            other: other.into(),
        }
    }

    /// Pick the form for `category`, falling back to `other`.
    #[must_use]
    pub fn select(&self, category: PluralCategory) -> &str {
        match category {
            PluralCategory::One if !self.one.is_empty() => &self.one,
            _ => &self.other,
        }
    }
}

/// Plural selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluralRule {
    /// `one` for exactly 1.
    #[default]
    English,
    /// `one` for 0 and 1 (CLDR `pt`).
    Portuguese,
}

impl PluralRule {
    /// Rule for a locale tag, matched on the primary language subtag.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "pt" => Self::Portuguese,
            _ => Self::English,
        }
    }

    /// Category for `count`.
    #[must_use]
    pub fn categorize(self, count: i64) -> PluralCategory {
        let n = count.unsigned_abs();
        match self {
            Self::English if n == 1 => PluralCategory::One,
            Self::Portuguese if n <= 1 => PluralCategory::One,
            _ => PluralCategory::Other,
        }
    }
}
