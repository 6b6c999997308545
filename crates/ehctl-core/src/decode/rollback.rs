// ── `show rollback` ──

use std::sync::LazyLock;

use serde::Serialize;
use tracing::debug;

use crate::model::FieldTable;
use crate::parse::{RecordPattern, extract_single};

static PATTERN: LazyLock<RecordPattern> = LazyLock::new(|| RecordPattern::single("rollback"));

/// What the device prints while no timer runs. Matched exactly.
const NOT_STARTED: &str = "not started";

/// State of the device-side rollback timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RollbackStatus {
    pub active: bool,
    /// Seconds the timer was armed with; `None` while inactive.
    pub timeout: Option<u32>,
}

impl RollbackStatus {
    pub const INACTIVE: Self = Self {
        active: false,
        timeout: None,
    };

    pub fn active(timeout: u32) -> Self {
        Self {
            active: true,
            timeout: Some(timeout),
        }
    }
}

/// Decode `rollback timeout : <value>`.
///
/// `not started` means inactive, an integer means active with that many
/// seconds, and anything else (including no line at all) is inactive.
pub fn decode_rollback(text: &str) -> RollbackStatus {
    let record = extract_single(text, &PATTERN, &FieldTable::STRINGS);
    let Some(value) = record.str("timeout") else {
        return RollbackStatus::INACTIVE;
    };
    if value == NOT_STARTED {
        return RollbackStatus::INACTIVE;
    }
    match value.parse::<u32>() {
        Ok(timeout) => RollbackStatus::active(timeout),
        Err(_) => {
            debug!(value, "unrecognized rollback timeout, treated as inactive");
            RollbackStatus::INACTIVE
        }
    }
}
