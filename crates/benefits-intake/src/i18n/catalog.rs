use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// Catalog keys for the messages this service renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKey {
    TextTooShort,
    TextTooLong,
    InvalidInput,
}

impl MessageKey {
    pub const ALL: [MessageKey; 3] = [
        MessageKey::TextTooShort,
        MessageKey::TextTooLong,
        MessageKey::InvalidInput,
    ];

    pub const fn key_name(self) -> &'static str {
        match self {
            MessageKey::TextTooShort => "validation.textTooShort",
            MessageKey::TextTooLong => "validation.textTooLong",
            MessageKey::InvalidInput => "validation.invalidInput",
        }
    }

    const fn english(self) -> &'static str {
        match self {
            MessageKey::TextTooShort => "Must contain at least {0} characters.",
            MessageKey::TextTooLong => "Must contain at most {0} characters.",
            MessageKey::InvalidInput => "Please enter valid input.",
        }
    }

    const fn spanish(self) -> &'static str {
        match self {
            MessageKey::TextTooShort => "Debe contener al menos {0} caracteres.",
            MessageKey::TextTooLong => "Debe contener como máximo {0} caracteres.",
            MessageKey::InvalidInput => "Ingrese un valor válido.",
        }
    }
}

/// A validation failure kept as a key plus arguments until it is rendered for a locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidationErrorMessage {
    pub key: MessageKey,
    pub args: Vec<String>,
}

impl ValidationErrorMessage {
    pub fn create(key: MessageKey, args: impl IntoIterator<Item = impl ToString>) -> Self {
        Self {
            key,
            args: args.into_iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub fn message(&self, messages: &dyn Messages) -> String {
        messages.at(self.key.key_name(), &self.args)
    }
}

/// Resolves message keys for one request locale.
pub trait Messages: Send + Sync {
    fn locale(&self) -> &Locale;
    fn at(&self, key: &str, args: &[String]) -> String;
}

type Table = HashMap<String, String>;

/// Per-locale message tables with fallback to the default locale.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    tables: Arc<HashMap<Locale, Table>>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::bundled()
    }
}

impl MessageCatalog {
    /// English and Spanish tables for every [`MessageKey`].
    pub fn bundled() -> Self {
        let mut tables = HashMap::new();
        tables.insert(Locale::default_locale(), table(MessageKey::english));
        if let Some(spanish) = Locale::parse("es-US") {
            tables.insert(spanish, table(MessageKey::spanish));
        }
        Self {
            tables: Arc::new(tables),
        }
    }

    pub fn empty() -> Self {
        Self {
            tables: Arc::new(HashMap::new()),
        }
    }

    pub fn with_message(mut self, locale: Locale, key: &str, template: &str) -> Self {
        Arc::make_mut(&mut self.tables)
            .entry(locale)
            .or_default()
            .insert(key.to_string(), template.to_string());
        self
    }

    pub fn supports(&self, locale: &Locale) -> bool {
        self.tables.contains_key(locale)
    }

    /// First supported locale from the preference list, matched exactly and then by language.
    pub fn matching(&self, preferences: &[Locale]) -> Option<Locale> {
        let exact = preferences.iter().find(|locale| self.supports(locale));
        let by_language = || {
            preferences.iter().find_map(|wanted| {
                let mut candidates: Vec<&Locale> = self
                    .tables
                    .keys()
                    .filter(|known| known.language() == wanted.language())
                    .collect();
                candidates.sort();
                candidates.first().map(|locale| (*locale).clone())
            })
        };
        exact.cloned().or_else(by_language)
    }

    /// Like [`MessageCatalog::matching`], falling back to the default locale.
    pub fn preferred(&self, preferences: &[Locale]) -> LocalizedMessages {
        let locale = self
            .matching(preferences)
            .unwrap_or_else(Locale::default_locale);
        self.localized(locale)
    }

    pub fn localized(&self, locale: Locale) -> LocalizedMessages {
        LocalizedMessages {
            catalog: self.clone(),
            locale,
        }
    }

    fn lookup(&self, locale: &Locale, key: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.tables
                    .get(&Locale::default_locale())
                    .and_then(|table| table.get(key))
            })
            .map(String::as_str)
    }
}

/// Catalog view bound to a single locale.
#[derive(Debug, Clone)]
pub struct LocalizedMessages {
    catalog: MessageCatalog,
    locale: Locale,
}

impl Messages for LocalizedMessages {
    fn locale(&self) -> &Locale {
        &self.locale
    }

    fn at(&self, key: &str, args: &[String]) -> String {
        match self.catalog.lookup(&self.locale, key) {
            Some(template) => format_positional(template, args),
            None => key.to_string(),
        }
    }
}

fn table(render: fn(MessageKey) -> &'static str) -> Table {
    MessageKey::ALL
        .iter()
        .map(|key| (key.key_name().to_string(), render(*key).to_string()))
        .collect()
}

/// Replace `{n}` placeholders with the matching argument; unknown indexes stay literal.
fn format_positional(template: &str, args: &[String]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((args.get(index)?, close))
        });
        match replaced {
            Some((arg, close)) => {
                output.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}
