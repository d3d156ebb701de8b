//! String catalog with locale fallback, plurals and interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: a lookup tries the requested locale,
//!    then each chain entry once, returning `None` if nobody has the key.
//! 2. **Single-pass interpolation**: `format()` replaces `{name}` tokens in
//!    one pass; substituted values are never re-scanned.
//! 3. **Immutable after build**: lookups take `&self`, so a built catalog can
//!    be shared freely.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in any locale | Returns `None` |
//! | Missing locale | Locale not loaded | Falls through chain |
//! | Bad interpolation arg | `{name}` but no `name` arg | Token left as-is |
//! | Duplicate key | `from_pairs` sees a key twice | `I18nError::DuplicateKey` |
//! | Malformed tag | `try_add_locale` with a bad tag | `I18nError::InvalidLocale` |

use std::collections::HashMap;
use std::fmt;

use crate::plural::{PluralCategory, PluralForms, PluralRule};

/// Locale identifier (e.g., `"en"`, `"pt-BR"`).
pub type Locale = String;

/// Errors from building a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale tag was empty or malformed.
    InvalidLocale(String),
    /// Duplicate key in the same locale.
    DuplicateKey { locale: String, key: String },
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLocale(l) => write!(f, "invalid locale: '{l}'"),
            Self::DuplicateKey { locale, key } => {
                write!(f, "duplicate key '{key}' in locale '{locale}'")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// A single entry: a plain string or plural forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringEntry {
    Simple(String),
    Plural(PluralForms),
}

/// Strings for a single locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleStrings {
    strings: HashMap<String, StringEntry>,
}

impl LocaleStrings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs, rejecting repeated keys.
    ///
    /// `locale` is only used for the error report.
    pub fn from_pairs<'a, I>(locale: &str, pairs: I) -> Result<Self, I18nError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut strings = Self::new();
        for (key, value) in pairs {
            if strings.strings.contains_key(key) {
                return Err(I18nError::DuplicateKey {
                    locale: locale.to_string(),
                    key: key.to_string(),
                });
            }
            strings.insert(key, value);
        }
        Ok(strings)
    }

    /// Insert (or replace) a simple string.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings
            .insert(key.into(), StringEntry::Simple(value.into()));
    }

    /// Insert (or replace) plural forms.
    pub fn insert_plural(&mut self, key: impl Into<String>, forms: PluralForms) {
        self.strings.insert(key.into(), StringEntry::Plural(forms));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StringEntry> {
        self.strings.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }
}

/// Catalog of localized strings with a fallback chain.
///
/// # Example
///
/// ```
/// use vdocs_i18n::{LocaleStrings, PluralForms, StringCatalog};
///
/// let mut catalog = StringCatalog::new();
///
/// let mut en = LocaleStrings::new();
/// en.insert("greeting", "Hello World!");
/// en.insert_plural("todos", PluralForms::new("{count} todo", "{count} todos"));
/// catalog.add_locale("en", en);
///
/// let mut pt = LocaleStrings::new();
/// pt.insert("greeting", "Olá Mundo!");
/// catalog.add_locale("pt-BR", pt);
/// catalog.set_fallback_chain(vec!["en".into()]);
///
/// assert_eq!(catalog.get("pt-BR", "greeting"), Some("Olá Mundo!"));
/// assert_eq!(
///     catalog.format_plural("pt-BR", "todos", 3, &[]),
///     Some("3 todos".to_string())
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: HashMap<Locale, LocaleStrings>,
    fallback_chain: Vec<Locale>,
    plural_rules: HashMap<Locale, PluralRule>,
}

impl StringCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add strings for a locale, replacing any previous set.
    ///
    /// The plural rule is derived from the tag.
    pub fn add_locale(&mut self, locale: impl Into<String>, strings: LocaleStrings) {
        let locale = locale.into();
        self.plural_rules
            .insert(locale.clone(), PluralRule::for_locale(&locale));
        self.locales.insert(locale, strings);
    }

    /// Like [`add_locale`](Self::add_locale) but validates the tag first:
    /// ASCII alphanumeric subtags of 1–8 characters separated by `-`.
    pub fn try_add_locale(
        &mut self,
        locale: impl Into<String>,
        strings: LocaleStrings,
    ) -> Result<(), I18nError> {
        let locale = locale.into();
        if !is_valid_tag(&locale) {
            return Err(I18nError::InvalidLocale(locale));
        }
        self.add_locale(locale, strings);
        Ok(())
    }

    /// Locales tried, in order, when the requested one lacks a key.
    pub fn set_fallback_chain(&mut self, chain: Vec<Locale>) {
        self.fallback_chain = chain;
    }

    /// Override the plural rule for a locale.
    pub fn set_plural_rule(&mut self, locale: impl Into<String>, rule: PluralRule) {
        self.plural_rules.insert(locale.into(), rule);
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<(&str, &StringEntry)> {
        let requested = self.locales.get_key_value(locale);
        let chain = self
            .fallback_chain
            .iter()
            .filter(|l| l.as_str() != locale)
            .filter_map(|l| self.locales.get_key_value(l.as_str()));
        requested
            .into_iter()
            .chain(chain)
            .find_map(|(tag, strings)| strings.get(key).map(|entry| (tag.as_str(), entry)))
    }

    /// Locale that would answer `key` for a request in `locale`.
    #[must_use]
    pub fn resolve(&self, locale: &str, key: &str) -> Option<&str> {
        self.lookup(locale, key).map(|(tag, _)| tag)
    }

    /// Look up a simple string. Plural entries answer with their `other` form.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        match self.lookup(locale, key)?.1 {
            StringEntry::Simple(s) => Some(s.as_str()),
            StringEntry::Plural(p) => Some(p.other.as_str()),
        }
    }

    /// Look up the plural form for `count`, using the rule of whichever
    /// locale answers.
    #[must_use]
    pub fn get_plural(&self, locale: &str, key: &str, count: i64) -> Option<&str> {
        let (tag, entry) = self.lookup(locale, key)?;
        let rule = self.plural_rules.get(tag).copied().unwrap_or_default();
        let category: PluralCategory = rule.categorize(count);
        match entry {
            StringEntry::Plural(forms) => Some(forms.select(category)),
            StringEntry::Simple(s) => Some(s.as_str()),
        }
    }

    /// Look up a string and substitute `{name}` tokens from `args`.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key)
            .map(|template| interpolate(template, args))
    }

    /// Plural lookup plus interpolation; `{count}` is supplied automatically.
    #[must_use]
    pub fn format_plural(
        &self,
        locale: &str,
        key: &str,
        count: i64,
        extra_args: &[(&str, &str)],
    ) -> Option<String> {
        self.get_plural(locale, key, count).map(|template| {
            let count_str = count.to_string();
            let mut all_args: Vec<(&str, &str)> = vec![("count", &count_str)];
            all_args.extend_from_slice(extra_args);
            interpolate(template, &all_args)
        })
    }

    /// Registered locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Whether `locale` has its own string set.
    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Keys from `reference_keys` that `locale` cannot answer, even through
    /// the fallback chain. Sorted.
    #[must_use]
    pub fn missing_keys(&self, locale: &str, reference_keys: &[&str]) -> Vec<String> {
        let mut missing: Vec<String> = reference_keys
            .iter()
            .filter(|key| self.resolve(locale, key).is_none())
            .map(|key| (*key).to_string())
            .collect();
        missing.sort_unstable();
        missing
    }
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag.split('-').all(|part| {
            (1..=8).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Single-pass `{name}` interpolation. Unmatched tokens left as-is.
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                match args.iter().find(|(name, _)| *name == token) {
                    Some((_, value)) => result.push_str(value),
                    None => {
                        result.push('{');
                        result.push_str(token);
                        result.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                // Unclosed brace
                result.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}
