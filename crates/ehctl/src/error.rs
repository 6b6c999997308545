//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use ehctl_config::ConfigError;
use ehctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {host}")]
    #[diagnostic(
        code(ehctl::connection_failed),
        help(
            "Check that the radio is reachable and accepts key-based SSH logins.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { host: String, reason: String },

    #[error("Connection to the device was lost")]
    #[diagnostic(code(ehctl::connection_lost), help("Reason: {reason}"))]
    ConnectionLost { reason: String },

    #[error("{message}")]
    #[diagnostic(code(ehctl::transport))]
    Transport { message: String },

    #[error("Aborted after {completed} item(s): {reason}")]
    #[diagnostic(
        code(ehctl::batch_aborted),
        help("Items finished before the failure are listed above. Re-run once the device is reachable.")
    )]
    BatchAborted { completed: usize, reason: String },

    // ── Device ───────────────────────────────────────────────────────

    #[error("Device rejected '{command}'")]
    #[diagnostic(code(ehctl::rejected), help("Device said: {output}"))]
    CommandRejected { command: String, output: String },

    #[error("Unexpected response to '{command}': {response}")]
    #[diagnostic(code(ehctl::unexpected_response))]
    UnexpectedResponse { command: String, response: String },

    #[error("{failed} of {total} item(s) failed")]
    #[diagnostic(
        code(ehctl::items_failed),
        help("Re-run with -o json to see the failure reason for each item.")
    )]
    ItemsFailed { failed: usize, total: usize },

    #[error("{message}")]
    #[diagnostic(
        code(ehctl::rollback_failed),
        help("Check the timer with: ehctl rollback status")
    )]
    RollbackFailed { message: String },

    // ── Input ────────────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ehctl::validation))]
    Validation { field: String, reason: String },

    #[error("Cannot read items from {path}: {reason}")]
    #[diagnostic(
        code(ehctl::items_file),
        help(
            "Expected a list of items, for example:\n  \
             - type: ip\n    slot: 1\n    address: 192.168.0.10\n    prefix_length: 24\n    vlan: 0"
        )
    )]
    ItemsFile { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ehctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ehctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(ehctl::no_device),
        help(
            "Pass --host, set EHCTL_HOST, or create a profile with: ehctl config init\n\
             Expected config at: {path}"
        )
    )]
    NoDevice { path: String },

    #[error(transparent)]
    #[diagnostic(code(ehctl::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {reason}")]
    #[diagnostic(code(ehctl::config_write))]
    ConfigWrite { reason: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ehctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. }
            | Self::ConnectionLost { .. }
            | Self::BatchAborted { .. } => exit_code::CONNECTION,
            Self::CommandRejected { .. } | Self::ItemsFailed { .. } | Self::RollbackFailed { .. } => {
                exit_code::REJECTED
            }
            Self::Validation { .. }
            | Self::ItemsFile { .. }
            | Self::NoDevice { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { host, reason } => Self::ConnectionFailed { host, reason },
            CoreError::ConnectionLost { reason } => Self::ConnectionLost { reason },
            CoreError::Transport { message } => Self::Transport { message },
            CoreError::CommandRejected { command, output } => {
                Self::CommandRejected { command, output }
            }
            CoreError::UnexpectedResponse { command, response } => {
                Self::UnexpectedResponse { command, response }
            }
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::BatchAborted { results, source } => Self::BatchAborted {
                completed: results.len(),
                reason: source.to_string(),
            },
        }
    }
}

impl From<ehctl_api::Error> for CliError {
    fn from(err: ehctl_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Serialization(e) => Self::ConfigWrite {
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}
