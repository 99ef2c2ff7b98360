//! Question definitions and the per-applicant wrappers that validate stored answers.

pub mod answer;
mod applicant_question;
mod definition;
mod localized;
mod text;

use std::collections::BTreeSet;

pub use applicant_question::{ApplicantQuestion, Scalar};
pub use definition::{
    QuestionDefinition, QuestionId, QuestionType, TextValidationPredicates, ValidationPredicates,
};
pub use localized::LocalizedStrings;
pub use text::TextQuestion;

use crate::i18n::ValidationErrorMessage;

/// Error reporting shared by every typed question wrapper.
pub trait PresentsErrors {
    /// Errors from a stored value of the wrong shape.
    fn type_specific_errors(&self) -> BTreeSet<ValidationErrorMessage>;

    /// Errors from the definition's validation predicates.
    fn question_errors(&self) -> BTreeSet<ValidationErrorMessage>;

    fn is_answered(&self) -> bool;

    fn has_type_specific_errors(&self) -> bool {
        !self.type_specific_errors().is_empty()
    }

    fn has_question_errors(&self) -> bool {
        !self.question_errors().is_empty()
    }

    fn all_errors(&self) -> BTreeSet<ValidationErrorMessage> {
        let mut errors = self.type_specific_errors();
        errors.extend(self.question_errors());
        errors
    }
}
