//! Applicant intake: answer storage, localized question rendering, uploads, and notifications.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerOutcome, ApplicantId, ApplicantRecord, ApplicantView, EmailNotification, NewApplicant,
    QuestionView, TextAnswer, UploadRequestInput,
};
pub use memory::{InMemoryApplicantRepository, InMemoryQuestionRepository};
pub use repository::{ApplicantRepository, QuestionRepository, RepositoryError};
pub use router::intake_router;
pub use service::{IntakeError, IntakeService};
