use crate::infra::email_client;
use benefits_intake::applicant::{ApplicantData, Path};
use benefits_intake::cloud::public_storage_from_config;
use benefits_intake::config::AppConfig;
use benefits_intake::error::AppError;
use benefits_intake::i18n::{Locale, MessageCatalog};
use benefits_intake::intake::IntakeError;
use benefits_intake::question::answer::answer_text_question;
use benefits_intake::question::{
    ApplicantQuestion, LocalizedStrings, PresentsErrors, QuestionDefinition, QuestionId,
    TextQuestion, TextValidationPredicates,
};
use benefits_intake::telemetry;
use clap::Args;

#[derive(Args, Debug)]
pub(crate) struct CheckTextArgs {
    /// Answer to validate
    #[arg(long)]
    pub(crate) value: String,
    /// Minimum number of characters
    #[arg(long)]
    pub(crate) min: Option<usize>,
    /// Maximum number of characters
    #[arg(long)]
    pub(crate) max: Option<usize>,
    /// Locale or Accept-Language list for rendered messages
    #[arg(long)]
    pub(crate) locale: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct UploadRequestArgs {
    /// Object key the upload will be stored under
    #[arg(long)]
    pub(crate) key: String,
    /// URL the storage provider redirects to after a successful upload
    #[arg(long)]
    pub(crate) redirect: String,
}

#[derive(Args, Debug)]
pub(crate) struct SendEmailArgs {
    /// Recipient address (repeatable)
    #[arg(long, required = true)]
    pub(crate) to: Vec<String>,
    #[arg(long)]
    pub(crate) subject: String,
    #[arg(long)]
    pub(crate) body: String,
}

pub(crate) fn run_check_text(args: CheckTextArgs) -> Result<(), AppError> {
    let errors = check_text(&args)?;
    if errors.is_empty() {
        println!("✔ \"{}\" is valid", args.value);
        return Ok(());
    }

    println!("✘ \"{}\" failed validation:", args.value);
    for error in errors {
        println!("  - {error}");
    }
    Ok(())
}

/// Rendered validation messages for a throwaway text question with the requested bounds.
pub(crate) fn check_text(args: &CheckTextArgs) -> Result<Vec<String>, AppError> {
    let predicates = match (args.min, args.max) {
        (Some(min), Some(max)) => TextValidationPredicates::create(min, max),
        (Some(min), None) => TextValidationPredicates::with_min_length(min),
        (None, Some(max)) => TextValidationPredicates::with_max_length(max),
        (None, None) => TextValidationPredicates::none(),
    };
    let definition = QuestionDefinition::text(
        QuestionId(0),
        "cli text check",
        Path::create("applicant.cli_check"),
        "Ad hoc validation from the command line",
        LocalizedStrings::default_only("Text"),
        LocalizedStrings::default(),
    )
    .with_text_predicates(predicates);

    let mut data = ApplicantData::new();
    answer_text_question(&mut data, definition.path(), &args.value).map_err(IntakeError::from)?;

    let locales = args
        .locale
        .as_deref()
        .map(Locale::from_accept_language)
        .unwrap_or_default();
    let messages = MessageCatalog::bundled().preferred(&locales);

    let question = TextQuestion::new(ApplicantQuestion::new(
        &definition,
        &data,
        &Path::applicant(),
    ));
    Ok(question
        .all_errors()
        .iter()
        .map(|error| error.message(&messages))
        .collect())
}

pub(crate) fn run_upload_request(args: UploadRequestArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let storage = public_storage_from_config(&config.storage);
    let request = storage.signed_upload_request(&args.key, &args.redirect)?;
    let rendered = serde_json::to_string_pretty(&request).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) async fn run_send_email(args: SendEmailArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let client = email_client(&config)?;
    client.send(&args.to, &args.subject, &args.body).await?;

    println!(
        "Sent \"{}\" from {} to {} recipient(s) ({:?})",
        args.subject,
        client.sender(),
        args.to.len(),
        config.environment
    );
    Ok(())
}
