use crate::domain::safety::{CONFIRMATION_VAR, CREDENTIAL_VAR};
use crate::error::ConfigError;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
/// Same per-request timeout the provider's official SDKs default to.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(80);
/// Largest page the provider serves; also the only page this tool reads.
pub const PAGE_LIMIT: u8 = 100;

/// Secret API key. `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Everything the cleanup run needs from its environment.
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    pub credential: Credential,
    pub confirmation: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl CleanupConfig {
    pub fn new(credential: Credential, confirmation: Option<String>) -> Self {
        Self {
            credential,
            confirmation,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads the credential and the confirmation flag through `lookup`.
    ///
    /// An empty credential is treated the same as a missing one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = lookup(CREDENTIAL_VAR)
            .filter(|key| !key.is_empty())
            .map(Credential::new)
            .ok_or(ConfigError::MissingCredential)?;

        Ok(Self::new(credential, lookup(CONFIRMATION_VAR)))
    }

    /// Loads `.env` from the working directory (or a parent) into the
    /// process environment. Variables already set are not overwritten. A
    /// missing file is fine; an unreadable or malformed one is fatal.
    pub fn load_env_file() -> Result<(), ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(()),
            Err(e) if e.not_found() => Ok(()),
            Err(e) => Err(ConfigError::EnvFile(e.to_string())),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Result<Self, ConfigError> {
        let api_base = api_base.into();
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                name: "STRIPE_API_BASE",
                reason: format!("expected an http(s) URL, got {api_base:?}"),
            });
        }
        self.api_base = api_base.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "STRIPE_TIMEOUT_SECS",
                reason: "must be at least 1 second".to_string(),
            });
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }
}
