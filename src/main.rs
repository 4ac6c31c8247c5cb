use billing_cleanup::application::cleanup::cleanup;
use billing_cleanup::config::{CleanupConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
use billing_cleanup::error::ConfigError;
use billing_cleanup::infrastructure::stripe::StripeClient;
use billing_cleanup::observability::{self, LogFormat};
use clap::Parser;
use miette::{IntoDiagnostic, Result};

/// Archives every product and deactivates every active price in a Stripe
/// account.
///
/// The API key is read from STRIPE_SECRET_KEY. Keys that do not look like
/// test keys are refused unless CONFIRM_PRODUCTION_CLEANUP is set to
/// `yes_i_know_what_im_doing`. Both may also come from a .env file.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Base URL of the billing API.
    #[arg(long, env = "STRIPE_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "STRIPE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn fatal(err: ConfigError) -> miette::Report {
    match err.help() {
        Some(help) => miette::miette!(help = help, "{err}"),
        None => miette::miette!("{err}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Variables already in the environment win over the file.
    CleanupConfig::load_env_file().map_err(fatal)?;

    let cli = Cli::parse();
    observability::init(cli.log_format);

    let config = CleanupConfig::from_env()
        .and_then(|config| config.with_api_base(cli.api_base))
        .and_then(|config| config.with_timeout_secs(cli.timeout_secs))
        .map_err(fatal)?;

    let client = StripeClient::new(&config).into_diagnostic()?;
    let report = cleanup(&config, Box::new(client)).await.map_err(fatal)?;

    // Per-item failures are already logged and do not change the exit status.
    if !report.is_clean() {
        tracing::warn!("Cleanup finished with errors; re-run to retry the remaining records");
    }

    Ok(())
}
