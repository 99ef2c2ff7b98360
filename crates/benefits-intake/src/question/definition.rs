use std::fmt;

use serde::{Deserialize, Serialize};

use super::localized::LocalizedStrings;
use crate::applicant::Path;

/// Stable identifier of a published question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
}

/// Length bounds for a text answer; each bound is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValidationPredicates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<usize>,
}

impl TextValidationPredicates {
    pub fn create(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length: Some(min_length),
            max_length: Some(max_length),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_min_length(min_length: usize) -> Self {
        Self {
            min_length: Some(min_length),
            max_length: None,
        }
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            min_length: None,
            max_length: Some(max_length),
        }
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }
}

/// Type-specific validation attached to a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationPredicates {
    Text(TextValidationPredicates),
}

/// Published, immutable description of one form question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    id: QuestionId,
    name: String,
    path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enumerator_id: Option<QuestionId>,
    description: String,
    question_text: LocalizedStrings,
    #[serde(default)]
    help_text: LocalizedStrings,
    validation: ValidationPredicates,
}

impl QuestionDefinition {
    /// A text question without length bounds.
    pub fn text(
        id: QuestionId,
        name: impl Into<String>,
        path: Path,
        description: impl Into<String>,
        question_text: LocalizedStrings,
        help_text: LocalizedStrings,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            path,
            enumerator_id: None,
            description: description.into(),
            question_text,
            help_text,
            validation: ValidationPredicates::Text(TextValidationPredicates::none()),
        }
    }

    pub fn with_text_predicates(self, predicates: TextValidationPredicates) -> Self {
        Self {
            validation: ValidationPredicates::Text(predicates),
            ..self
        }
    }

    /// Ties the question to a repeated entity managed by another question.
    pub fn with_enumerator(self, enumerator_id: QuestionId) -> Self {
        Self {
            enumerator_id: Some(enumerator_id),
            ..self
        }
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn enumerator_id(&self) -> Option<QuestionId> {
        self.enumerator_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn question_text(&self) -> &LocalizedStrings {
        &self.question_text
    }

    pub fn help_text(&self) -> &LocalizedStrings {
        &self.help_text
    }

    pub fn validation(&self) -> &ValidationPredicates {
        &self.validation
    }

    pub fn question_type(&self) -> QuestionType {
        match self.validation {
            ValidationPredicates::Text(_) => QuestionType::Text,
        }
    }

    pub fn text_predicates(&self) -> Option<&TextValidationPredicates> {
        match &self.validation {
            ValidationPredicates::Text(predicates) => Some(predicates),
        }
    }
}
