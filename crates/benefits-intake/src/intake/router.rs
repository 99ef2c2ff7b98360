use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{
    AnswerOutcome, ApplicantId, EmailNotification, NewApplicant, TextAnswer, UploadRequestInput,
};
use super::repository::{ApplicantRepository, QuestionRepository, RepositoryError};
use super::service::{IntakeError, IntakeService};
use crate::cloud::StorageError;
use crate::i18n::Locale;
use crate::question::QuestionId;

/// Router builder exposing the applicant intake endpoints.
pub fn intake_router<A, Q>(service: Arc<IntakeService<A, Q>>) -> Router
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    Router::new()
        .route("/api/v1/applicants", post(create_applicant_handler::<A, Q>))
        .route(
            "/api/v1/applicants/:applicant_id",
            get(applicant_handler::<A, Q>),
        )
        .route("/api/v1/questions", get(questions_handler::<A, Q>))
        .route(
            "/api/v1/applicants/:applicant_id/questions/:question_id",
            get(question_view_handler::<A, Q>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/questions/:question_id/answer",
            post(answer_handler::<A, Q>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/uploads",
            post(upload_request_handler::<A, Q>),
        )
        .route("/api/v1/files/*file_key", get(file_url_handler::<A, Q>))
        .route(
            "/api/v1/notifications/email",
            post(notify_handler::<A, Q>),
        )
        .with_state(service)
}

pub(crate) async fn create_applicant_handler<A, Q>(
    State(service): State<Arc<IntakeService<A, Q>>>,
    Json(input): Json<NewApplicant>,
) -> Response
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    match service.create_applicant(input) {
        Ok(record) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn applicant_handler<A, Q>(
    State(service): State<Arc<IntakeService<A, Q>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    match service.applicant(&ApplicantId(applicant_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn questions_handler<A, Q>(
    State(service): State<Arc<IntakeService<A, Q>>>,
) -> Response
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    match service.questions() {
        Ok(definitions) => (StatusCode::OK, Json(definitions)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn question_view_handler<A, Q>(
    State(service): State<Arc<IntakeService<A, Q>>>,
    Path((applicant_id, question_id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    let locales = requested_locales(&headers);
    match service.question_view(
        &ApplicantId(applicant_id),
        QuestionId(question_id),
        &locales,
    ) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<A, Q>(
    State(service): State<Arc<IntakeService<A, Q>>>,
    Path((applicant_id, question_id)): Path<(String, u64)>,
    headers: HeaderMap,
    Json(answer): Json<TextAnswer>,
) -> Response
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    let locales = requested_locales(&headers);
    match service.answer_text(
        &ApplicantId(applicant_id),
        QuestionId(question_id),
        &answer.value,
        &locales,
    ) {
        Ok(outcome @ AnswerOutcome::Saved(_)) => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(outcome @ AnswerOutcome::Rejected(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(outcome)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upload_request_handler<A, Q>(
    State(service): State<Arc<IntakeService<A, Q>>>,
    Path(applicant_id): Path<String>,
    Json(input): Json<UploadRequestInput>,
) -> Response
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    match service.upload_request(
        &ApplicantId(applicant_id),
        &input.file_name,
        &input.success_redirect,
    ) {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn file_url_handler<A, Q>(
    State(service): State<Arc<IntakeService<A, Q>>>,
    Path(file_key): Path<String>,
) -> Response
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    match service.public_file_url(&file_key) {
        Ok(url) => (StatusCode::OK, Json(json!({ "file_key": file_key, "url": url }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn notify_handler<A, Q>(
    State(service): State<Arc<IntakeService<A, Q>>>,
    Json(notification): Json<EmailNotification>,
) -> Response
where
    A: ApplicantRepository + 'static,
    Q: QuestionRepository + 'static,
{
    match service.notify(notification).await {
        Ok(recipients) => (
            StatusCode::ACCEPTED,
            Json(json!({ "status": "sent", "recipients": recipients })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn requested_locales(headers: &HeaderMap) -> Vec<Locale> {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Locale::from_accept_language)
        .unwrap_or_default()
}

impl IntakeError {
    /// HTTP status for this failure, shared by the intake routes and [`crate::error::AppError`].
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::ApplicantNotFound(_)
            | IntakeError::QuestionNotFound(_)
            | IntakeError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            IntakeError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            IntakeError::WrongQuestionType(_)
            | IntakeError::InvalidFileName(_)
            | IntakeError::Storage(StorageError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            IntakeError::Data(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IntakeError::Storage(StorageError::Unsupported { .. }) => StatusCode::NOT_IMPLEMENTED,
            IntakeError::Email(_) => StatusCode::BAD_GATEWAY,
            IntakeError::Storage(_) | IntakeError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn error_response(error: IntakeError) -> Response {
    let status = error.status_code();

    if status.is_server_error() {
        let configuration =
            matches!(&error, IntakeError::Storage(err) if err.is_configuration_error());
        warn!(
            error = %error,
            status = status.as_u16(),
            configuration,
            "intake request failed"
        );
    }

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
