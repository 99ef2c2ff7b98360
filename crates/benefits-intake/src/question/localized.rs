use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

/// Locale-keyed strings that fall back to the default locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedStrings(BTreeMap<Locale, String>);

impl LocalizedStrings {
    pub fn of(locale: Locale, value: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(locale, value.into());
        Self(map)
    }

    /// Shorthand for a single default-locale entry.
    pub fn default_only(value: impl Into<String>) -> Self {
        Self::of(Locale::default_locale(), value)
    }

    pub fn with(mut self, locale: Locale, value: impl Into<String>) -> Self {
        self.0.insert(locale, value.into());
        self
    }

    pub fn get(&self, locale: &Locale) -> Option<&str> {
        self.get_exact(locale)
            .or_else(|| self.get_exact(&Locale::default_locale()))
    }

    pub fn get_exact(&self, locale: &Locale) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
