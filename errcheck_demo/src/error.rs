//! Infrastructure errors of the demo binary.
//!
//! Failures of the simulated hardware are not errors here: they travel as
//! `errcheck::Failure` plus the diagnostic slot and are reported.

use errcheck_common::config::ConfigError;
use thiserror::Error;

/// Errors that stop the demo binary.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `--inject` named a code outside the set.
    #[error("unknown error code: {0}")]
    UnknownCode(String),

    /// Ctrl-C handler installation failed.
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
