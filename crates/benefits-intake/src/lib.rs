//! Applicant intake for public benefits programs: typed questions over a JSON answer document,
//! localized validation messages, public file storage, and transactional email.

pub mod applicant;
pub mod cloud;
pub mod config;
pub mod email;
pub mod error;
pub mod i18n;
pub mod intake;
pub mod question;
pub mod telemetry;
