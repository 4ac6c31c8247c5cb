//! Logging initialisation.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Target for operator notices (production caution, completion) that must be
/// shown whatever `RUST_LOG` says.
pub const NOTICE_TARGET: &str = "billing_cleanup::notice";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs the global subscriber writing to stderr, filtered by `RUST_LOG`
/// (default `info`). Events on [`NOTICE_TARGET`] always pass at `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(format: LogFormat) {
    let filter = with_notices(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => builder
            .with_ansi(std::io::stderr().is_terminal())
            .try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Adds the notice directive after the user's directives so it wins over
/// any level they set for the crate or globally.
fn with_notices(filter: EnvFilter) -> EnvFilter {
    match format!("{NOTICE_TARGET}=info").parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}
