use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{
    AnswerOutcome, ApplicantId, ApplicantRecord, EmailNotification, NewApplicant, QuestionView,
};
use super::repository::{ApplicantRepository, QuestionRepository, RepositoryError};
use crate::applicant::{ApplicantData, ApplicantDataError, Path};
use crate::cloud::{PublicStorageClient, StorageError, StorageUploadRequest};
use crate::email::{EmailClient, EmailError};
use crate::i18n::{Locale, MessageCatalog};
use crate::question::answer::answer_text_question;
use crate::question::{
    ApplicantQuestion, PresentsErrors, QuestionDefinition, QuestionId, QuestionType, TextQuestion,
};

/// Times an answer is applied before a persistent write conflict is returned.
pub const ANSWER_ATTEMPTS: u32 = 3;

/// Service composing the repositories, storage client, email client, and message catalog.
pub struct IntakeService<A, Q> {
    applicants: Arc<A>,
    questions: Arc<Q>,
    storage: Arc<dyn PublicStorageClient>,
    email: EmailClient,
    catalog: MessageCatalog,
    sequence: AtomicU64,
}

impl<A, Q> IntakeService<A, Q>
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    pub fn new(
        applicants: Arc<A>,
        questions: Arc<Q>,
        storage: Arc<dyn PublicStorageClient>,
        email: EmailClient,
    ) -> Self {
        Self {
            applicants,
            questions,
            storage,
            email,
            catalog: MessageCatalog::bundled(),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    fn next_applicant_id(&self) -> ApplicantId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        ApplicantId(format!("applicant-{id:06}"))
    }

    /// Register an applicant with an empty answer document.
    pub fn create_applicant(&self, input: NewApplicant) -> Result<ApplicantRecord, IntakeError> {
        let mut data = ApplicantData::new();
        if let Some(locale) = input.preferred_locale {
            data.set_preferred_locale(locale);
        }

        let email = input
            .email
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty());

        let record = ApplicantRecord {
            id: self.next_applicant_id(),
            email,
            data,
            created_at: Utc::now(),
            version: 0,
        };

        let stored = self.applicants.insert(record)?;
        info!(applicant_id = %stored.id, "applicant created");
        Ok(stored)
    }

    pub fn applicant(&self, applicant_id: &ApplicantId) -> Result<ApplicantRecord, IntakeError> {
        self.applicants
            .fetch(applicant_id)?
            .ok_or_else(|| IntakeError::ApplicantNotFound(applicant_id.clone()))
    }

    pub fn questions(&self) -> Result<Vec<QuestionDefinition>, IntakeError> {
        Ok(self.questions.list()?)
    }

    /// Render a question against the applicant's stored answers.
    pub fn question_view(
        &self,
        applicant_id: &ApplicantId,
        question_id: QuestionId,
        preferences: &[Locale],
    ) -> Result<QuestionView, IntakeError> {
        let record = self.applicant(applicant_id)?;
        let definition = self.definition(question_id)?;
        Ok(self.render(&definition, &record.data, preferences))
    }

    /// Write a text answer into a working copy and persist it only when it validates.
    ///
    /// A concurrent write to the same applicant makes the update conflict; the answer is
    /// then reapplied to the fresh record, up to [`ANSWER_ATTEMPTS`] times.
    pub fn answer_text(
        &self,
        applicant_id: &ApplicantId,
        question_id: QuestionId,
        value: &str,
        preferences: &[Locale],
    ) -> Result<AnswerOutcome, IntakeError> {
        let mut record = self.applicant(applicant_id)?;
        let definition = self.definition(question_id)?;
        if definition.question_type() != QuestionType::Text {
            return Err(IntakeError::WrongQuestionType(question_id));
        }

        let mut attempt = 1;
        loop {
            let mut working = record.data.clone();
            let path = ApplicantQuestion::new(&definition, &working, &Path::applicant())
                .contextualized_path()
                .clone();
            answer_text_question(&mut working, &path, value)?;

            let view = self.render(&definition, &working, preferences);
            if !view.errors.is_empty() {
                debug!(%applicant_id, %question_id, errors = view.errors.len(), "answer rejected");
                return Ok(AnswerOutcome::Rejected(view));
            }

            record.data = working;
            match self.applicants.update(record) {
                Ok(()) => {
                    info!(%applicant_id, %question_id, "answer saved");
                    return Ok(AnswerOutcome::Saved(view));
                }
                Err(RepositoryError::Conflict) if attempt < ANSWER_ATTEMPTS => {
                    debug!(
                        %applicant_id,
                        %question_id,
                        attempt,
                        "applicant changed concurrently; retrying answer"
                    );
                    attempt += 1;
                    record = self.applicant(applicant_id)?;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Upload descriptor for a file stored under the applicant's key prefix.
    pub fn upload_request(
        &self,
        applicant_id: &ApplicantId,
        file_name: &str,
        success_redirect: &str,
    ) -> Result<StorageUploadRequest, IntakeError> {
        let record = self.applicant(applicant_id)?;
        let file_name = sanitize_file_name(file_name)?;
        let file_key = format!("{}/{}", record.id, file_name);

        let request = self
            .storage
            .signed_upload_request(&file_key, success_redirect)?;
        info!(
            %applicant_id,
            vendor = %request.vendor,
            file_key = %request.file_key,
            "upload request issued"
        );
        Ok(request)
    }

    pub fn public_file_url(&self, file_key: &str) -> Result<String, IntakeError> {
        Ok(self.storage.public_display_url(file_key)?)
    }

    /// Send a notification; returns the number of distinct recipients addressed.
    pub async fn notify(&self, notification: EmailNotification) -> Result<usize, IntakeError> {
        let recipients: BTreeSet<&str> = notification
            .recipients
            .iter()
            .map(|address| address.trim())
            .filter(|address| !address.is_empty())
            .collect();
        self.email
            .send(&recipients, &notification.subject, &notification.body)
            .await?;
        Ok(recipients.len())
    }

    fn definition(&self, question_id: QuestionId) -> Result<QuestionDefinition, IntakeError> {
        self.questions
            .fetch(question_id)?
            .ok_or(IntakeError::QuestionNotFound(question_id))
    }

    fn render(
        &self,
        definition: &QuestionDefinition,
        data: &ApplicantData,
        preferences: &[Locale],
    ) -> QuestionView {
        // Request preferences, then the applicant's stored locale, then the default.
        let locale = self
            .catalog
            .matching(preferences)
            .or_else(|| {
                data.preferred_locale()
                    .and_then(|stored| self.catalog.matching(std::slice::from_ref(stored)))
            })
            .unwrap_or_else(Locale::default_locale);
        let messages = self.catalog.localized(locale.clone());

        let question = ApplicantQuestion::new(definition, data, &Path::applicant());
        let text = TextQuestion::new(question.clone());
        let errors = text
            .all_errors()
            .iter()
            .map(|error| error.message(&messages))
            .collect();

        QuestionView {
            question_id: definition.id(),
            question_type: definition.question_type(),
            question_text: question.question_text(&locale).to_string(),
            help_text: question.help_text(&locale).to_string(),
            value: text.text_value().map(str::to_string),
            answered: text.is_answered(),
            errors,
            last_updated_at: question.last_updated_at(),
            locale,
        }
    }
}

/// Keep only the final path component so applicants cannot write outside their prefix.
fn sanitize_file_name(raw: &str) -> Result<&str, IntakeError> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        return Err(IntakeError::InvalidFileName(raw.to_string()));
    }
    Ok(name)
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("applicant {0} not found")]
    ApplicantNotFound(ApplicantId),
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
    #[error("question {0} does not accept text answers")]
    WrongQuestionType(QuestionId),
    #[error("invalid file name `{0}`")]
    InvalidFileName(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Data(#[from] ApplicantDataError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Email(#[from] EmailError),
}
