use thiserror::Error;

use crate::domain::safety::{CONFIRMATION_SENTINEL, CONFIRMATION_VAR, CREDENTIAL_VAR};

/// Fatal, pre-flight errors. Any of these stops the process before a single
/// request reaches the billing provider.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STRIPE_SECRET_KEY environment variable is not set")]
    MissingCredential,
    #[error(
        "refusing to run against what appears to be a production API key; \
         this would archive ALL products and deactivate ALL prices in the account"
    )]
    ProductionBlocked,
    #[error("invalid value for {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    #[error("could not load .env file: {0}")]
    EnvFile(String),
}

impl ConfigError {
    /// Operator-facing hint printed under the error.
    pub fn help(&self) -> Option<String> {
        match self {
            ConfigError::MissingCredential => Some(format!(
                "export {CREDENTIAL_VAR} or add it to a .env file in the working directory"
            )),
            ConfigError::ProductionBlocked => Some(format!(
                "to proceed with a production key, add this to your .env file:\n{CONFIRMATION_VAR}={CONFIRMATION_SENTINEL}"
            )),
            ConfigError::EnvFile(_) => Some(
                "fix or remove the offending line; each entry must be KEY=value".to_string(),
            ),
            ConfigError::InvalidSetting { .. } => None,
        }
    }
}

/// Errors raised by a billing client while listing or updating records.
///
/// The cleanup procedure treats every variant the same way: log and move on.
#[derive(Error, Debug)]
pub enum BillingError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, BillingError>;
