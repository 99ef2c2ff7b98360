//! Writers that store answers where the typed question wrappers read them.

use chrono::{DateTime, Utc};

use super::applicant_question::Scalar;
use crate::applicant::{ApplicantData, ApplicantDataError, Path};

/// Store a text answer under `contextualized_path` and stamp the update time.
pub fn answer_text_question(
    data: &mut ApplicantData,
    contextualized_path: &Path,
    value: &str,
) -> Result<(), ApplicantDataError> {
    answer_text_question_at(data, contextualized_path, value, Utc::now())
}

pub fn answer_text_question_at(
    data: &mut ApplicantData,
    contextualized_path: &Path,
    value: &str,
    at: DateTime<Utc>,
) -> Result<(), ApplicantDataError> {
    data.put_string(&contextualized_path.join(Scalar::Text.key()), value)?;
    data.put_timestamp(&contextualized_path.join(Scalar::UpdatedAt.key()), at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn writes_text_and_timestamp() {
        let mut data = ApplicantData::new();
        let path = Path::create("applicant.name");
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();

        answer_text_question_at(&mut data, &path, "hello", at).expect("answer stored");

        assert_eq!(data.read_string(&path.join("text")), Some("hello"));
        assert_eq!(data.read_timestamp(&path.join("updated_at")), Some(at));
    }
}
