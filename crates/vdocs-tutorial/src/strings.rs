#![forbid(unsafe_code)]

//! Built-in tutorial strings and the locale-bound lookup context.
//!
//! The site is the Brazilian Portuguese translation, so `pt-BR` is the
//! primary locale and `en` the fallback. Some tutorial text (the todo seeds)
//! is intentionally left untranslated upstream and resolves through the
//! fallback chain.

use std::rc::Rc;

use tracing::warn;
use vdocs_i18n::{I18nError, LocaleStrings, PluralForms, StringCatalog};

pub const DEFAULT_LOCALE: &str = "pt-BR";
pub const FALLBACK_LOCALE: &str = "en";

pub const HELLO_MESSAGE: &str = "hello.message";
pub const INPUT_REVERSE: &str = "input.reverse";
pub const INPUT_NOTIFY: &str = "input.notify";
pub const INPUT_NAVIGATION_PREVENTED: &str = "input.navigation_prevented";
pub const TODO_HEADER: &str = "todo.header";
pub const TODO_ADD: &str = "todo.add";
pub const TODO_DRAFT: &str = "todo.draft";
pub const TODO_SEED_HTML: &str = "todo.seed.html";
pub const TODO_SEED_JS: &str = "todo.seed.javascript";
pub const TODO_SEED_VUE: &str = "todo.seed.vue";

/// Seed keys, in display order.
pub const TODO_SEEDS: [&str; 3] = [TODO_SEED_HTML, TODO_SEED_JS, TODO_SEED_VUE];

const PT_BR: &[(&str, &str)] = &[
    (HELLO_MESSAGE, "Hello World!"),
    (INPUT_REVERSE, "Inverter Mensagem"),
    (INPUT_NOTIFY, "Anexar \"prevent default\""),
    (INPUT_NAVIGATION_PREVENTED, "A navegação foi impedida."),
    (TODO_ADD, "Adicionar Afazer"),
    (TODO_DRAFT, "Novo afazer: {draft}"),
];

const EN: &[(&str, &str)] = &[
    (HELLO_MESSAGE, "Hello World!"),
    (INPUT_REVERSE, "Reverse Message"),
    (INPUT_NOTIFY, "Append \"prevent default\""),
    (INPUT_NAVIGATION_PREVENTED, "Navigation was prevented."),
    (TODO_ADD, "Add Todo"),
    (TODO_DRAFT, "New todo: {draft}"),
    (TODO_SEED_HTML, "Learn HTML"),
    (TODO_SEED_JS, "Learn JavaScript"),
    (TODO_SEED_VUE, "Learn Vue"),
];

/// Catalog with every string the tutorial examples use.
pub fn tutorial_catalog() -> Result<StringCatalog, I18nError> {
    let mut pt = LocaleStrings::from_pairs(DEFAULT_LOCALE, PT_BR.iter().copied())?;
    pt.insert_plural(
        TODO_HEADER,
        PluralForms::new("{count} afazer", "{count} afazeres"),
    );
    let mut en = LocaleStrings::from_pairs(FALLBACK_LOCALE, EN.iter().copied())?;
    en.insert_plural(TODO_HEADER, PluralForms::new("{count} todo", "{count} todos"));

    let mut catalog = StringCatalog::new();
    catalog.try_add_locale(DEFAULT_LOCALE, pt)?;
    catalog.try_add_locale(FALLBACK_LOCALE, en)?;
    catalog.set_fallback_chain(vec![FALLBACK_LOCALE.into()]);
    Ok(catalog)
}

/// A catalog bound to the locale the examples render in.
///
/// Cheap to clone; every component keeps its own handle.
#[derive(Debug, Clone)]
pub struct TutorialContext {
    catalog: Rc<StringCatalog>,
    locale: String,
}

impl TutorialContext {
    #[must_use]
    pub fn new(catalog: StringCatalog, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        if !catalog.has_locale(&locale) {
            warn!(%locale, "locale not in catalog, using fallback chain");
        }
        Self {
            catalog: Rc::new(catalog),
            locale,
        }
    }

    /// Context over [`tutorial_catalog`].
    pub fn builtin(locale: impl Into<String>) -> Result<Self, I18nError> {
        Ok(Self::new(tutorial_catalog()?, locale))
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn catalog(&self) -> &StringCatalog {
        &self.catalog
    }

    /// Localized text for `key`; the key itself when nobody has it.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        match self.catalog.get(&self.locale, key) {
            Some(text) => text.to_string(),
            None => {
                warn!(key, locale = %self.locale, "missing tutorial string");
                key.to_string()
            }
        }
    }

    /// Interpolated text for `key`.
    #[must_use]
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.catalog
            .format(&self.locale, key, args)
            .unwrap_or_else(|| self.text(key))
    }

    /// Pluralized, interpolated text for `key`.
    #[must_use]
    pub fn plural(&self, key: &str, count: usize) -> String {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        self.catalog
            .format_plural(&self.locale, key, count, &[])
            .unwrap_or_else(|| self.text(key))
    }

    /// The localized todo seeds, in order.
    #[must_use]
    pub fn todo_seeds(&self) -> Vec<String> {
        TODO_SEEDS.iter().map(|key| self.text(key)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_keys() -> Vec<&'static str> {
        let mut keys: Vec<&str> = EN.iter().map(|(k, _)| *k).collect();
        keys.push(TODO_HEADER);
        keys
    }

    #[test]
    fn every_key_resolves_in_both_locales() {
        let catalog = tutorial_catalog().expect("built-in catalog");
        for locale in [DEFAULT_LOCALE, FALLBACK_LOCALE] {
            assert!(
                catalog.missing_keys(locale, &all_keys()).is_empty(),
                "{locale} is missing keys"
            );
        }
    }

    #[test]
    fn seeds_fall_back_to_english() {
        let ctx = TutorialContext::builtin(DEFAULT_LOCALE).expect("context");
        assert_eq!(
            ctx.todo_seeds(),
            vec!["Learn HTML", "Learn JavaScript", "Learn Vue"]
        );
        assert_eq!(ctx.catalog().resolve(DEFAULT_LOCALE, TODO_SEED_VUE), Some("en"));
    }

    #[test]
    fn portuguese_notice() {
        let ctx = TutorialContext::builtin("pt-BR").expect("context");
        assert_eq!(ctx.text(INPUT_NAVIGATION_PREVENTED), "A navegação foi impedida.");
        let en = TutorialContext::builtin("en").expect("context");
        assert_eq!(en.text(INPUT_NAVIGATION_PREVENTED), "Navigation was prevented.");
    }

    #[test]
    fn header_pluralizes_per_locale() {
        let pt = TutorialContext::builtin("pt-BR").expect("context");
        assert_eq!(pt.plural(TODO_HEADER, 0), "0 afazer");
        assert_eq!(pt.plural(TODO_HEADER, 3), "3 afazeres");
        let en = TutorialContext::builtin("en").expect("context");
        assert_eq!(en.plural(TODO_HEADER, 0), "0 todos");
        assert_eq!(en.plural(TODO_HEADER, 1), "1 todo");
    }

    #[test]
    fn unknown_locale_and_key() {
        let ctx = TutorialContext::builtin("fr").expect("context");
        assert_eq!(ctx.text(TODO_ADD), "Add Todo");
        assert_eq!(ctx.text("no.such.key"), "no.such.key");
        assert_eq!(ctx.format(TODO_DRAFT, &[("draft", "x")]), "New todo: x");
    }
}
