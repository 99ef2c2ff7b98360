use chrono::{DateTime, Utc};

use super::definition::{QuestionDefinition, QuestionType};
use crate::applicant::{ApplicantData, Path};
use crate::i18n::Locale;

/// Leaf keys stored beneath a question's contextualized path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Text,
    UpdatedAt,
}

impl Scalar {
    pub const fn key(self) -> &'static str {
        match self {
            Scalar::Text => "text",
            Scalar::UpdatedAt => "updated_at",
        }
    }
}

/// A question definition paired with one applicant's answers for a single render or validation pass.
#[derive(Debug, Clone)]
pub struct ApplicantQuestion<'a> {
    definition: &'a QuestionDefinition,
    data: &'a ApplicantData,
    contextualized_path: Path,
}

impl<'a> ApplicantQuestion<'a> {
    /// `context` is the applicant root or the path of a repeated entity.
    pub fn new(definition: &'a QuestionDefinition, data: &'a ApplicantData, context: &Path) -> Self {
        let contextualized_path = if *context == Path::applicant() {
            definition.path().clone()
        } else {
            context.join(definition.path().key_name())
        };

        Self {
            definition,
            data,
            contextualized_path,
        }
    }

    pub fn definition(&self) -> &'a QuestionDefinition {
        self.definition
    }

    pub fn data(&self) -> &'a ApplicantData {
        self.data
    }

    pub fn question_type(&self) -> QuestionType {
        self.definition.question_type()
    }

    pub fn contextualized_path(&self) -> &Path {
        &self.contextualized_path
    }

    pub fn scalar_path(&self, scalar: Scalar) -> Path {
        self.contextualized_path.join(scalar.key())
    }

    pub fn question_text(&self, locale: &Locale) -> &'a str {
        self.definition.question_text().get(locale).unwrap_or("")
    }

    pub fn help_text(&self, locale: &Locale) -> &'a str {
        self.definition.help_text().get(locale).unwrap_or("")
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.data.read_timestamp(&self.scalar_path(Scalar::UpdatedAt))
    }
}
