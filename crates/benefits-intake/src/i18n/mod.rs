//! Locale handling and the message catalog used to render validation errors.

mod catalog;
mod locale;

pub use catalog::{LocalizedMessages, MessageCatalog, MessageKey, Messages, ValidationErrorMessage};
pub use locale::Locale;
