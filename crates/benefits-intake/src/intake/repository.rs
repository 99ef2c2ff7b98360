use super::domain::{ApplicantId, ApplicantRecord};
use crate::question::{QuestionDefinition, QuestionId};

/// Storage abstraction for applicant records so the service can be exercised in isolation.
pub trait ApplicantRepository: Send + Sync {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError>;
    /// Replace the stored record; fails with [`RepositoryError::Conflict`] when
    /// `record.version` no longer matches the stored version.
    fn update(&self, record: ApplicantRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError>;
}

/// Published question definitions; inserting an existing id is a conflict.
pub trait QuestionRepository: Send + Sync {
    fn insert(&self, definition: QuestionDefinition) -> Result<(), RepositoryError>;
    fn fetch(&self, id: QuestionId) -> Result<Option<QuestionDefinition>, RepositoryError>;
    fn list(&self) -> Result<Vec<QuestionDefinition>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record conflicts with the stored state")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
