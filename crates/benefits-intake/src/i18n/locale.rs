use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Normalized language tag such as `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(String);

impl Locale {
    pub const DEFAULT_TAG: &'static str = "en-US";

    /// Parse `language[-REGION]`, accepting `_` as separator and any casing.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split(['-', '_']);
        let language = parts.next()?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return None;
        }

        let mut tag = language.to_ascii_lowercase();
        if let Some(region) = parts.next() {
            let valid_region = (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
                || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()));
            if !valid_region {
                return None;
            }
            tag.push('-');
            tag.push_str(&region.to_ascii_uppercase());
        }
        if parts.next().is_some() {
            return None;
        }
        Some(Self(tag))
    }

    pub fn default_locale() -> Self {
        Self(Self::DEFAULT_TAG.to_string())
    }

    /// Preference-ordered locales from an `Accept-Language` header, quality weights honored.
    pub fn from_accept_language(header: &str) -> Vec<Self> {
        let mut weighted: Vec<(f32, usize, Locale)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, entry)| {
                let mut pieces = entry.split(';');
                let locale = Locale::parse(pieces.next()?)?;
                let quality = pieces
                    .find_map(|param| param.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then_some((quality, position, locale))
            })
            .collect();

        weighted.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        weighted.into_iter().map(|(_, _, locale)| locale).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::default_locale()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Locale::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid locale tag '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_separator() {
        assert_eq!(Locale::parse("es_us").map(|l| l.to_string()), Some("es-US".into()));
        assert_eq!(Locale::parse("EN").map(|l| l.to_string()), Some("en".into()));
        assert_eq!(Locale::parse("es-419").map(|l| l.to_string()), Some("es-419".into()));
    }

    #[test]
    fn parse_rejects_malformed_tags() {
        assert!(Locale::parse("").is_none());
        assert!(Locale::parse("*").is_none());
        assert!(Locale::parse("english").is_none());
        assert!(Locale::parse("en-USA-x").is_none());
    }

    #[test]
    fn accept_language_orders_by_quality() {
        let locales = Locale::from_accept_language("fr;q=0.3, es-US;q=0.9, en-US, *;q=0.1");
        let tags: Vec<_> = locales.iter().map(Locale::as_str).collect();
        assert_eq!(tags, ["en-US", "es-US", "fr"]);
    }

    #[test]
    fn accept_language_skips_zero_quality() {
        let locales = Locale::from_accept_language("es-US;q=0, en-US;q=0.5");
        assert_eq!(locales, vec![Locale::default_locale()]);
    }
}
