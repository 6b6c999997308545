use thiserror::Error;

/// Top-level error type for the `ehctl-api` crate.
///
/// Covers every way a single request/response exchange with the device CLI
/// can go wrong. `ehctl-core` decides which of these abort a whole batch.
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ─────────────────────────────────────────────────────
    /// The transport could not reach the device (refused, DNS, auth).
    #[error("Cannot connect to {host}: {reason}")]
    ConnectionFailed { host: String, reason: String },

    /// The session dropped or timed out in the middle of an exchange.
    #[error("Connection to device lost: {reason}")]
    ConnectionLost { reason: String },

    /// The local transport program could not be started.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    // ── Command ─────────────────────────────────────────────────────
    /// The device answered, but with an error banner instead of output.
    #[error("Device rejected '{command}': {output}")]
    CommandRejected { command: String, output: String },

    // ── Replay ──────────────────────────────────────────────────────
    /// A scripted transport was asked for a command it has no answer for.
    #[error("No scripted response for '{command}'")]
    Unscripted { command: String },

    /// A replay file could not be read or parsed.
    #[error("Invalid replay file {path}: {reason}")]
    Replay { path: String, reason: String },
}

impl Error {
    /// Returns `true` if no further communication with the device is possible
    /// on this session.
    ///
    /// A rejected command only affects the request that produced it; every
    /// other variant means the session itself is gone.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::CommandRejected { .. })
    }

    /// Truncated device output for diagnostics (first 200 characters).
    pub fn output_excerpt(&self) -> Option<String> {
        match self {
            Self::CommandRejected { output, .. } => Some(excerpt(output)),
            _ => None,
        }
    }
}

pub(crate) fn excerpt(output: &str) -> String {
    const LIMIT: usize = 200;
    match output.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &output[..idx]),
        None => output.to_owned(),
    }
}
