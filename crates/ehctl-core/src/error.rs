// ── Core error types ──
//
// Errors that escape the engine. Per-item problems (a rejected set, an
// unexpected acknowledgement, a verification mismatch) are results, not
// errors; only a lost session or invalid caller input ends up here.
// The `From<ehctl_api::Error>` impl translates transport errors into
// domain variants.

use thiserror::Error;

use crate::reconcile::ReconcileResult;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot connect to {host}: {reason}")]
    ConnectionFailed { host: String, reason: String },

    #[error("Connection to device lost: {reason}")]
    ConnectionLost { reason: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Device rejected '{command}': {output}")]
    CommandRejected { command: String, output: String },

    #[error("Unexpected response to '{command}': {response}")]
    UnexpectedResponse { command: String, response: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Batch errors ─────────────────────────────────────────────────
    /// The session died part-way through a batch. `results` holds one
    /// entry per item finished before that, in input order.
    #[error("Batch aborted after {} item(s): {source}", .results.len())]
    BatchAborted {
        results: Vec<ReconcileResult>,
        #[source]
        source: Box<CoreError>,
    },
}

impl CoreError {
    /// `true` for every variant that means the session is unusable.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::ConnectionLost { .. } | Self::Transport { .. } => {
                true
            }
            Self::BatchAborted { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ehctl_api::Error> for CoreError {
    fn from(err: ehctl_api::Error) -> Self {
        match err {
            ehctl_api::Error::ConnectionFailed { host, reason } => {
                Self::ConnectionFailed { host, reason }
            }
            ehctl_api::Error::ConnectionLost { reason } => Self::ConnectionLost { reason },
            ehctl_api::Error::CommandRejected { command, output } => {
                Self::CommandRejected { command, output }
            }
            other @ (ehctl_api::Error::Spawn { .. }
            | ehctl_api::Error::Unscripted { .. }
            | ehctl_api::Error::Replay { .. }) => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_translate() {
        let err: CoreError = ehctl_api::Error::ConnectionLost {
            reason: "eof".into(),
        }
        .into();
        assert!(matches!(err, CoreError::ConnectionLost { .. }));
        assert!(err.is_transport());

        let err: CoreError = ehctl_api::Error::Unscripted {
            command: "show rf".into(),
        }
        .into();
        assert!(err.is_transport());
        assert!(err.to_string().contains("show rf"));
    }

    #[test]
    fn rejected_command_is_not_a_transport_failure() {
        let err: CoreError = ehctl_api::Error::CommandRejected {
            command: "set ip 1".into(),
            output: "% Error".into(),
        }
        .into();
        assert!(!err.is_transport());
    }

    #[test]
    fn aborted_batch_reports_its_cause() {
        let err = CoreError::BatchAborted {
            results: Vec::new(),
            source: Box::new(CoreError::ConnectionLost {
                reason: "connection timed out".into(),
            }),
        };
        assert!(err.is_transport());
        assert!(err.to_string().starts_with("Batch aborted after 0 item(s)"));
    }
}
