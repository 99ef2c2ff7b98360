use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::applicant::Path;
use crate::cloud::{AwsPublicStorage, AzurePublicStorage, PublicStorageClient};
use crate::config::{AppEnvironment, AwsCredentials};
use crate::email::{
    EmailClient, EmailSendMetrics, MailTransport, MailTransportError, OutboundEmail, SendOutcome,
};
use crate::i18n::Locale;
use crate::intake::domain::{ApplicantId, ApplicantRecord};
use crate::intake::memory::{InMemoryApplicantRepository, InMemoryQuestionRepository};
use crate::intake::repository::{ApplicantRepository, RepositoryError};
use crate::intake::{intake_router, IntakeService};
use crate::question::{
    LocalizedStrings, QuestionDefinition, QuestionId, TextValidationPredicates,
};

pub(super) const NAME_QUESTION: QuestionId = QuestionId(1);
pub(super) const NICKNAME_QUESTION: QuestionId = QuestionId(2);

pub(super) fn spanish() -> Locale {
    Locale::parse("es-US").expect("valid locale")
}

pub(super) fn name_question() -> QuestionDefinition {
    QuestionDefinition::text(
        NAME_QUESTION,
        "applicant name",
        Path::create("applicant.name"),
        "Legal name of the applicant",
        LocalizedStrings::default_only("What is your name?").with(spanish(), "¿Cuál es su nombre?"),
        LocalizedStrings::default_only("Use the name on your ID."),
    )
    .with_text_predicates(TextValidationPredicates::create(2, 10))
}

pub(super) fn nickname_question() -> QuestionDefinition {
    QuestionDefinition::text(
        NICKNAME_QUESTION,
        "nickname",
        Path::create("applicant.nickname"),
        "Optional preferred name",
        LocalizedStrings::default_only("What should we call you?"),
        LocalizedStrings::default(),
    )
}

pub(super) fn questions() -> Arc<InMemoryQuestionRepository> {
    Arc::new(
        InMemoryQuestionRepository::with_definitions([name_question(), nickname_question()])
            .expect("unique question ids"),
    )
}

#[derive(Default)]
pub(super) struct RecordingTransport {
    pub(super) delivered: Mutex<Vec<OutboundEmail>>,
    pub(super) fail: bool,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    fn provider(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, email: &OutboundEmail) -> Result<(), MailTransportError> {
        self.delivered
            .lock()
            .expect("transport mutex poisoned")
            .push(email.clone());
        if self.fail {
            return Err(MailTransportError::Api {
                status: 503,
                message: "mailbox unavailable".to_string(),
            });
        }
        Ok(())
    }
}

pub(super) struct NoopMetrics;

impl EmailSendMetrics for NoopMetrics {
    fn record(&self, _provider: &str, _outcome: SendOutcome, _elapsed: Duration) {}
}

pub(super) fn email_client(transport: Arc<RecordingTransport>) -> EmailClient {
    EmailClient::new(
        transport,
        Arc::new(NoopMetrics),
        "benefits@example.gov",
        AppEnvironment::Production,
    )
}

pub(super) fn aws_storage() -> Arc<dyn PublicStorageClient> {
    Arc::new(
        AwsPublicStorage::new("intake-files", "us-east-1").with_credentials(AwsCredentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: None,
        }),
    )
}

pub(super) fn azure_storage() -> Arc<dyn PublicStorageClient> {
    Arc::new(AzurePublicStorage)
}

pub(super) type MemoryService = IntakeService<InMemoryApplicantRepository, InMemoryQuestionRepository>;

pub(super) struct Harness {
    pub(super) service: Arc<MemoryService>,
    pub(super) applicants: Arc<InMemoryApplicantRepository>,
    pub(super) transport: Arc<RecordingTransport>,
}

pub(super) fn harness_with(storage: Arc<dyn PublicStorageClient>, transport: RecordingTransport) -> Harness {
    let applicants = Arc::new(InMemoryApplicantRepository::default());
    let transport = Arc::new(transport);
    let service = IntakeService::new(
        applicants.clone(),
        questions(),
        storage,
        email_client(transport.clone()),
    );
    Harness {
        service: Arc::new(service),
        applicants,
        transport,
    }
}

pub(super) fn harness() -> Harness {
    harness_with(aws_storage(), RecordingTransport::default())
}

pub(super) fn router(harness: &Harness) -> axum::Router {
    intake_router(harness.service.clone())
}

pub(super) struct UnavailableRepository;

impl ApplicantRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ApplicantRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
