use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SEPARATOR: char = '.';

/// Dot-delimited key path into an applicant data document, e.g. `applicant.name.text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub const APPLICANT_ROOT: &'static str = "applicant";

    /// Parse a path, ignoring surrounding whitespace and empty segments.
    pub fn create(raw: &str) -> Self {
        let segments = raw
            .trim()
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The root under which every applicant answer lives.
    pub fn applicant() -> Self {
        Self::create(Self::APPLICANT_ROOT)
    }

    pub fn join(&self, suffix: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(Self::create(suffix).segments);
        Self { segments }
    }

    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Final segment, or an empty string for the empty path.
    pub fn key_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for Path {
    fn from(value: &str) -> Self {
        Self::create(value)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::create(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_drops_blank_segments() {
        let path = Path::create(" applicant..my.path. name ");
        assert_eq!(path.segments(), ["applicant", "my", "path", "name"]);
        assert_eq!(path.to_string(), "applicant.my.path.name");
    }

    #[test]
    fn join_and_parent_are_inverse() {
        let base = Path::create("applicant.household");
        let joined = base.join("name.text");
        assert_eq!(joined.to_string(), "applicant.household.name.text");
        assert_eq!(joined.parent().parent(), base);
        assert_eq!(joined.key_name(), "text");
        assert!(joined.starts_with(&Path::applicant()));
    }

    #[test]
    fn empty_path_has_no_key() {
        let path = Path::empty();
        assert!(path.is_empty());
        assert_eq!(path.key_name(), "");
        assert!(path.parent().is_empty());
    }

    #[test]
    fn serializes_as_string() {
        let path = Path::create("applicant.name");
        let json = serde_json::to_string(&path).expect("serializes");
        assert_eq!(json, "\"applicant.name\"");
        let back: Path = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, path);
    }
}
