mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod server;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::report::{self as report_cmd, ReportCommandArgs};
use crate::cmd::serve;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::github::GitHubClient;
use crate::infra::openai::OpenAiClient;
use crate::infra::smtp::SmtpMailer;

#[derive(Parser)]
#[command(
    name = "mergemail",
    version,
    about = "Emails plain-language summaries of merged pull requests"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for repository webhook events and report on each one.
    Serve,
    /// Run one report pass for a repository and exit.
    Report(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Repository owner (user or organization login).
    #[arg(long)]
    owner: String,
    /// Repository name.
    #[arg(long)]
    repo: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let context = build_context(config)?;

    match cli.command {
        Commands::Serve => serve::run(context).await,
        Commands::Report(args) => {
            let outcome = report_cmd::run(
                &context,
                ReportCommandArgs {
                    owner: args.owner,
                    repo: args.repo,
                },
            )
            .await?;
            println!(
                "Report sent: {} merged pull request(s) summarized ({}).",
                outcome.matched_changesets, outcome.delivery
            );
            Ok(())
        }
    }
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    let history = Arc::new(GitHubClient::new(config.github_token.clone())?);
    let generator = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.max_completion_tokens,
    )?);
    let mailer = Arc::new(SmtpMailer::new(
        &config.smtp_host,
        config.smtp_username.clone(),
        config.smtp_password.clone(),
    )?);
    Ok(AppContext::new(config, history, generator, mailer))
}
