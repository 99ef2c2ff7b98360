//! Per-applicant answer storage addressed by dot-delimited paths.

mod data;
mod path;

pub use data::{ApplicantData, ApplicantDataError};
pub use path::Path;
