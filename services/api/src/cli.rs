use crate::commands::{
    run_check_text, run_send_email, run_upload_request, CheckTextArgs, SendEmailArgs,
    UploadRequestArgs,
};
use crate::server;
use benefits_intake::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Benefits Intake",
    about = "Run the benefits intake service and exercise its integrations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate a text answer against length bounds and print localized errors
    CheckText(CheckTextArgs),
    /// Print a signed upload descriptor for a file key
    UploadRequest(UploadRequestArgs),
    /// Send an email through the configured transport
    SendEmail(SendEmailArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::CheckText(args) => run_check_text(args),
        Command::UploadRequest(args) => run_upload_request(args),
        Command::SendEmail(args) => run_send_email(args).await,
    }
}
