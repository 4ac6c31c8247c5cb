//! Test-versus-production classification of the API credential.
//!
//! The classification is a plain substring heuristic: any key whose text
//! contains `test` in any case is treated as a test key. It cannot tell a
//! restricted live key named `..._test_...` from a real test key, and it is
//! not meant to.

use crate::error::ConfigError;

pub const CREDENTIAL_VAR: &str = "STRIPE_SECRET_KEY";
pub const CONFIRMATION_VAR: &str = "CONFIRM_PRODUCTION_CLEANUP";
pub const CONFIRMATION_SENTINEL: &str = "yes_i_know_what_im_doing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Test,
    Production,
}

impl KeyMode {
    pub fn classify(credential: &str) -> Self {
        if credential.to_lowercase().contains("test") {
            KeyMode::Test
        } else {
            KeyMode::Production
        }
    }
}

/// What the gate decided for a given credential and confirmation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clearance {
    /// Test key, nothing to report.
    Test,
    /// Production key with the exact confirmation sentinel. Callers must warn.
    ConfirmedProduction,
}

/// Decides whether cleanup may run.
///
/// The confirmation only counts when it equals the sentinel byte for byte;
/// surrounding whitespace or a different case is a refusal.
pub fn check(credential: &str, confirmation: Option<&str>) -> Result<Clearance, ConfigError> {
    match KeyMode::classify(credential) {
        KeyMode::Test => Ok(Clearance::Test),
        KeyMode::Production if confirmation == Some(CONFIRMATION_SENTINEL) => {
            Ok(Clearance::ConfirmedProduction)
        }
        KeyMode::Production => Err(ConfigError::ProductionBlocked),
    }
}
