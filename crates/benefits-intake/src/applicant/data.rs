use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::path::Path;
use crate::i18n::Locale;

/// Errors raised while writing into an applicant data document.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApplicantDataError {
    #[error("cannot write to an empty path")]
    EmptyPath,
    #[error("path {path} passes through a non-object value at {conflict}")]
    PathConflict { path: String, conflict: String },
    #[error("applicant document must be a JSON object")]
    NotAnObject,
    #[error("invalid applicant document: {0}")]
    Malformed(String),
}

/// Tree-shaped answer document owned by a single applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantData {
    document: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preferred_locale: Option<Locale>,
}

impl Default for ApplicantData {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicantData {
    pub fn new() -> Self {
        let mut root = Map::new();
        root.insert(Path::APPLICANT_ROOT.to_string(), Value::Object(Map::new()));
        Self {
            document: Value::Object(root),
            preferred_locale: None,
        }
    }

    /// Wrap an externally persisted document.
    pub fn from_document(document: Value) -> Result<Self, ApplicantDataError> {
        if !document.is_object() {
            return Err(ApplicantDataError::NotAnObject);
        }
        Ok(Self {
            document,
            preferred_locale: None,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, ApplicantDataError> {
        let data: Self = serde_json::from_str(raw)
            .map_err(|err| ApplicantDataError::Malformed(err.to_string()))?;
        if !data.document.is_object() {
            return Err(ApplicantDataError::NotAnObject);
        }
        Ok(data)
    }

    pub fn to_json(&self) -> String {
        // Serializing a Value tree with string keys cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn preferred_locale(&self) -> Option<&Locale> {
        self.preferred_locale.as_ref()
    }

    pub fn set_preferred_locale(&mut self, locale: Locale) {
        self.preferred_locale = Some(locale);
    }

    pub fn has_path(&self, path: &Path) -> bool {
        self.read_value(path).is_some()
    }

    pub fn read_value(&self, path: &Path) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.document, |node, segment| node.get(segment.as_str()))
    }

    /// Absent when missing, null, or not a string.
    pub fn read_string(&self, path: &Path) -> Option<&str> {
        self.read_value(path).and_then(Value::as_str)
    }

    pub fn read_timestamp(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.read_value(path)
            .and_then(Value::as_i64)
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Store `value` verbatim; the empty string is a real answer.
    pub fn put_string(&mut self, path: &Path, value: &str) -> Result<(), ApplicantDataError> {
        self.put(path, Value::String(value.to_string()))
    }

    /// Store a point in time as epoch milliseconds.
    pub fn put_timestamp(
        &mut self,
        path: &Path,
        at: DateTime<Utc>,
    ) -> Result<(), ApplicantDataError> {
        self.put(path, Value::from(at.timestamp_millis()))
    }

    pub fn remove(&mut self, path: &Path) -> Option<Value> {
        let (key, parents) = path.segments().split_last()?;
        let mut node = &mut self.document;
        for segment in parents {
            node = node.get_mut(segment.as_str())?;
        }
        node.as_object_mut()?.remove(key.as_str())
    }

    fn put(&mut self, path: &Path, value: Value) -> Result<(), ApplicantDataError> {
        let (key, parents) = path
            .segments()
            .split_last()
            .ok_or(ApplicantDataError::EmptyPath)?;

        let mut node = &mut self.document;
        let mut walked = Path::empty();
        for segment in parents {
            walked = walked.join(segment);
            let map = node
                .as_object_mut()
                .ok_or_else(|| conflict(path, &walked.parent()))?;
            let child = map
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if child.is_null() {
                *child = Value::Object(Map::new());
            }
            if !child.is_object() {
                return Err(conflict(path, &walked));
            }
            node = child;
        }

        let map = node
            .as_object_mut()
            .ok_or_else(|| conflict(path, &walked))?;
        map.insert(key.clone(), value);
        Ok(())
    }
}

fn conflict(path: &Path, at: &Path) -> ApplicantDataError {
    ApplicantDataError::PathConflict {
        path: path.to_string(),
        conflict: at.to_string(),
    }
}
