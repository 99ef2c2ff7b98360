use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::applicant::ApplicantData;
use crate::i18n::Locale;
use crate::question::{QuestionId, QuestionType};

/// Identifier wrapper for applicants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository record: contact details plus the answer document.
///
/// `version` counts stored writes; an update carrying a stale version is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub id: ApplicantId,
    pub email: Option<String>,
    pub data: ApplicantData,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl ApplicantRecord {
    pub fn view(&self) -> ApplicantView {
        ApplicantView {
            applicant_id: self.id.clone(),
            email: self.email.clone(),
            preferred_locale: self.data.preferred_locale().cloned(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewApplicant {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferred_locale: Option<Locale>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantView {
    pub applicant_id: ApplicantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_locale: Option<Locale>,
    pub created_at: DateTime<Utc>,
}

/// A question as rendered for one applicant in one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub question_id: QuestionId,
    pub question_type: QuestionType,
    pub locale: Locale,
    pub question_text: String,
    pub help_text: String,
    pub value: Option<String>,
    pub answered: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextAnswer {
    pub value: String,
}

/// Result of an answer submission; rejected answers are not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "question", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Saved(QuestionView),
    Rejected(QuestionView),
}

impl AnswerOutcome {
    pub fn view(&self) -> &QuestionView {
        match self {
            AnswerOutcome::Saved(view) | AnswerOutcome::Rejected(view) => view,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, AnswerOutcome::Saved(_))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequestInput {
    pub file_name: String,
    pub success_redirect: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailNotification {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}
