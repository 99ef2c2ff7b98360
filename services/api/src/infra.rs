use benefits_intake::applicant::Path;
use benefits_intake::cloud::public_storage_from_config;
use benefits_intake::config::{AppConfig, ConfigError};
use benefits_intake::email::{
    EmailClient, GraphMailTransport, LogMailTransport, MailTransport, PrometheusEmailSendMetrics,
};
use benefits_intake::error::AppError;
use benefits_intake::i18n::Locale;
use benefits_intake::intake::{
    InMemoryApplicantRepository, InMemoryQuestionRepository, IntakeService,
};
use benefits_intake::question::{
    LocalizedStrings, QuestionDefinition, QuestionId, TextValidationPredicates,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

pub(crate) type MemoryIntakeService =
    IntakeService<InMemoryApplicantRepository, InMemoryQuestionRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Graph when credentials are configured; the logging transport otherwise, never in production.
pub(crate) fn mail_transport(config: &AppConfig) -> Result<Arc<dyn MailTransport>, AppError> {
    match &config.email.graph {
        Some(credentials) => Ok(Arc::new(GraphMailTransport::new(
            credentials.clone(),
            config.email.sender_address.clone(),
        ))),
        None if config.environment.is_prod() => Err(ConfigError::MissingMailTransport.into()),
        None => {
            warn!("graph credentials not configured; email will be logged instead of sent");
            Ok(Arc::new(LogMailTransport))
        }
    }
}

pub(crate) fn email_client(config: &AppConfig) -> Result<EmailClient, AppError> {
    Ok(EmailClient::new(
        mail_transport(config)?,
        Arc::new(PrometheusEmailSendMetrics),
        config.email.sender_address.clone(),
        config.environment,
    ))
}

pub(crate) fn build_intake_service(config: &AppConfig) -> Result<MemoryIntakeService, AppError> {
    let questions = InMemoryQuestionRepository::with_definitions(sample_questions())?;
    Ok(IntakeService::new(
        Arc::new(InMemoryApplicantRepository::default()),
        Arc::new(questions),
        public_storage_from_config(&config.storage),
        email_client(config)?,
    ))
}

fn spanish() -> Option<Locale> {
    Locale::parse("es-US")
}

fn localized(english: &str, spanish_text: &str) -> LocalizedStrings {
    let strings = LocalizedStrings::default_only(english);
    match spanish() {
        Some(locale) => strings.with(locale, spanish_text),
        None => strings,
    }
}

/// Starter question catalog served until an admin surface publishes real programs.
pub(crate) fn sample_questions() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::text(
            QuestionId(1),
            "applicant first name",
            Path::create("applicant.name.first"),
            "Applicant's legal first name",
            localized("What is your first name?", "¿Cuál es su nombre?"),
            localized(
                "Use the name shown on your identification.",
                "Use el nombre que aparece en su identificación.",
            ),
        )
        .with_text_predicates(TextValidationPredicates::create(1, 50)),
        QuestionDefinition::text(
            QuestionId(2),
            "applicant last name",
            Path::create("applicant.name.last"),
            "Applicant's legal last name",
            localized("What is your last name?", "¿Cuál es su apellido?"),
            LocalizedStrings::default(),
        )
        .with_text_predicates(TextValidationPredicates::create(1, 50)),
        QuestionDefinition::text(
            QuestionId(3),
            "employer name",
            Path::create("applicant.employment.employer"),
            "Current employer, if any",
            localized("Who is your current employer?", "¿Quién es su empleador actual?"),
            localized(
                "Leave blank if you are not working.",
                "Déjelo en blanco si no está trabajando.",
            ),
        )
        .with_text_predicates(TextValidationPredicates::with_max_length(100)),
        QuestionDefinition::text(
            QuestionId(4),
            "household notes",
            Path::create("applicant.household.notes"),
            "Free-form notes about the household",
            localized(
                "Is there anything else we should know about your household?",
                "¿Hay algo más que debamos saber sobre su hogar?",
            ),
            LocalizedStrings::default(),
        )
        .with_text_predicates(TextValidationPredicates::with_max_length(500)),
    ]
}
