use std::collections::BTreeSet;

use super::applicant_question::{ApplicantQuestion, Scalar};
use super::PresentsErrors;
use crate::i18n::{MessageKey, ValidationErrorMessage};

/// Typed view over a text question's stored answer.
#[derive(Debug, Clone)]
pub struct TextQuestion<'a> {
    question: ApplicantQuestion<'a>,
}

impl<'a> TextQuestion<'a> {
    pub fn new(question: ApplicantQuestion<'a>) -> Self {
        Self { question }
    }

    pub fn applicant_question(&self) -> &ApplicantQuestion<'a> {
        &self.question
    }

    /// Absent until the applicant writes an answer.
    pub fn text_value(&self) -> Option<&'a str> {
        self.question
            .data()
            .read_string(&self.question.scalar_path(Scalar::Text))
    }

    fn length_errors(&self, text: &str) -> Option<ValidationErrorMessage> {
        let predicates = self.question.definition().text_predicates()?;
        let length = text.chars().count();

        if let Some(min) = predicates.min_length() {
            if length < min {
                return Some(ValidationErrorMessage::create(MessageKey::TextTooShort, [min]));
            }
        }
        if let Some(max) = predicates.max_length() {
            if length > max {
                return Some(ValidationErrorMessage::create(MessageKey::TextTooLong, [max]));
            }
        }
        None
    }
}

impl PresentsErrors for TextQuestion<'_> {
    fn type_specific_errors(&self) -> BTreeSet<ValidationErrorMessage> {
        let stored = self
            .question
            .data()
            .read_value(&self.question.scalar_path(Scalar::Text));

        match stored {
            Some(value) if !value.is_string() && !value.is_null() => {
                BTreeSet::from([ValidationErrorMessage::create(
                    MessageKey::InvalidInput,
                    Vec::<String>::new(),
                )])
            }
            _ => BTreeSet::new(),
        }
    }

    fn question_errors(&self) -> BTreeSet<ValidationErrorMessage> {
        self.text_value()
            .and_then(|text| self.length_errors(text))
            .into_iter()
            .collect()
    }

    fn is_answered(&self) -> bool {
        self.question
            .data()
            .has_path(&self.question.scalar_path(Scalar::Text))
    }
}
