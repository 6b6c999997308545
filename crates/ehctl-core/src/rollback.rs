// ── Rollback-timer controller ──
//
// The device can arm a timer that reverts the running configuration
// unless it is cleared in time. The controller drives that timer to a
// target state, reading the live status first every time.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::decode::RollbackStatus;
use crate::error::CoreError;

/// Upper bound the device accepts for `set rollback timeout`.
pub const MAX_ROLLBACK_TIMEOUT: u32 = 86_400;

/// Device operations the controller needs.
pub trait RollbackBackend {
    fn status(&mut self) -> Result<RollbackStatus, ehctl_api::Error>;

    /// Arm (or re-arm) the timer; returns the raw acknowledgement.
    fn arm(&mut self, timeout: u32) -> Result<String, ehctl_api::Error>;

    /// Stop the timer, keeping the current configuration.
    fn clear(&mut self) -> Result<String, ehctl_api::Error>;
}

impl<B: RollbackBackend + ?Sized> RollbackBackend for &mut B {
    fn status(&mut self) -> Result<RollbackStatus, ehctl_api::Error> {
        (**self).status()
    }

    fn arm(&mut self, timeout: u32) -> Result<String, ehctl_api::Error> {
        (**self).arm(timeout)
    }

    fn clear(&mut self) -> Result<String, ehctl_api::Error> {
        (**self).clear()
    }
}

/// Desired timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "timeout", rename_all = "lowercase")]
pub enum RollbackTarget {
    /// Armed with this many seconds.
    Present(u32),
    Absent,
}

/// Outcome of driving the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackReport {
    pub changed: bool,
    pub target: RollbackTarget,
    /// Timeout after the operation (predicted in dry-run), `None` when
    /// the timer is not running.
    pub timeout: Option<u32>,
    pub message: String,
    /// Set when the device did not confirm the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl RollbackReport {
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

fn arm_confirmed(response: &str) -> bool {
    let lower = response.to_lowercase();
    lower.contains("set done") || lower.contains("rollbacktimeout")
}

fn clear_confirmed(response: &str) -> bool {
    response.contains("rollback cleared")
}

/// `seconds` as the device prints it, `unknown` when the status had none.
fn seconds(timeout: Option<u32>) -> String {
    timeout.map_or_else(|| "unknown".to_owned(), |t| t.to_string())
}

fn refused(target: RollbackTarget, current: RollbackStatus, failure: String) -> RollbackReport {
    warn!(%failure, "rollback change not confirmed");
    RollbackReport {
        changed: false,
        target,
        timeout: current.timeout,
        message: failure.clone(),
        failure: Some(failure),
    }
}

/// Send a mutating rollback command, folding a device rejection into the
/// response text so it is reported like any other unconfirmed change.
fn send(result: Result<String, ehctl_api::Error>) -> Result<String, CoreError> {
    match result {
        Ok(response) => Ok(response),
        Err(ehctl_api::Error::CommandRejected { output, .. }) => Ok(output),
        Err(err) => Err(err.into()),
    }
}

/// Drive the rollback timer to `target`.
///
/// With `dry_run` the mutating command is skipped and the final timeout is
/// predicted from the target instead of re-read.
pub fn set_rollback<B: RollbackBackend + ?Sized>(
    backend: &mut B,
    target: RollbackTarget,
    dry_run: bool,
) -> Result<RollbackReport, CoreError> {
    if let RollbackTarget::Present(timeout) = target {
        if timeout > MAX_ROLLBACK_TIMEOUT {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "Timeout must be between 0 and {MAX_ROLLBACK_TIMEOUT} seconds (got {timeout})"
                ),
            });
        }
    }

    let current = backend.status()?;
    debug!(?current, ?target, "rollback status read");

    let (changed, message) = match target {
        RollbackTarget::Present(timeout) => {
            if current.active && current.timeout == Some(timeout) {
                (false, format!("Rollback already active with {timeout} second timeout"))
            } else {
                if !dry_run {
                    let response = send(backend.arm(timeout))?;
                    if !arm_confirmed(&response) {
                        let failure = format!(
                            "Unexpected response from set rollback: {}",
                            response.trim()
                        );
                        return Ok(refused(target, current, failure));
                    }
                }
                let message = if current.active {
                    format!(
                        "Rollback timeout changed from {} to {timeout} seconds",
                        seconds(current.timeout)
                    )
                } else {
                    format!("Rollback activated with {timeout} second timeout")
                };
                (true, message)
            }
        }
        RollbackTarget::Absent => {
            if current.active {
                if !dry_run {
                    let response = send(backend.clear())?;
                    if !clear_confirmed(&response) {
                        let failure = format!(
                            "Unexpected response from clear rollback: {}",
                            response.trim()
                        );
                        return Ok(refused(target, current, failure));
                    }
                }
                let message = format!(
                    "Rollback cleared (was active with {} second timeout)",
                    seconds(current.timeout)
                );
                (true, message)
            } else {
                (false, "Rollback already cleared".to_owned())
            }
        }
    };

    let timeout = if dry_run {
        match target {
            RollbackTarget::Present(timeout) => Some(timeout),
            RollbackTarget::Absent => None,
        }
    } else {
        backend.status()?.timeout
    };

    if changed && !dry_run {
        info!(%message, "rollback timer updated");
    }

    Ok(RollbackReport {
        changed,
        target,
        timeout,
        message,
        failure: None,
    })
}
