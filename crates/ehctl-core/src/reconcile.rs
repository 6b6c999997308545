// ── Reconciliation engine ──
//
// read → compare → (apply → check ack → re-read → compare)
//
// The device is the only source of truth: the engine never assumes a set
// took effect until a fresh read shows the desired fields.

use regex::RegexBuilder;
use serde::Serialize;
use strum::Display;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{ConfigItem, FlatRecord};

/// How the engine reads and mutates one item's slot.
pub trait ItemBackend {
    /// Current state of the item's slot; `None` when the device has no
    /// record for it.
    fn read(&mut self, item: &ConfigItem) -> Result<Option<FlatRecord>, ehctl_api::Error>;

    /// Send the item's mutating command and return the raw acknowledgement.
    fn apply(&mut self, item: &ConfigItem) -> Result<String, ehctl_api::Error>;
}

impl<B: ItemBackend + ?Sized> ItemBackend for &mut B {
    fn read(&mut self, item: &ConfigItem) -> Result<Option<FlatRecord>, ehctl_api::Error> {
        (**self).read(item)
    }

    fn apply(&mut self, item: &ConfigItem) -> Result<String, ehctl_api::Error> {
        (**self).apply(item)
    }
}

/// Apply changes, or only report what would change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Apply,
    Check,
}

/// Why an item did not reach its desired state.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Failure {
    /// The item failed validation; nothing was sent.
    #[error("{message}")]
    Invalid { message: String },

    /// The device answered a command with an error banner.
    #[error("device rejected '{command}': {output}")]
    Rejected { command: String, output: String },

    /// The set was not acknowledged for this item's own slot.
    #[error("unexpected acknowledgement: {response}")]
    UnexpectedAcknowledgement { response: String },

    /// The set was acknowledged but the re-read disagrees.
    #[error("state after apply does not match the desired state")]
    VerificationMismatch {
        desired: FlatRecord,
        observed: Option<FlatRecord>,
    },
}

/// Terminal state of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Display)]
#[serde(tag = "status", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// Already matched; no mutating command sent.
    Unchanged,
    /// Set, acknowledged, and verified.
    Applied,
    /// Check mode: a set would have been sent.
    WouldApply,
    Failed { failure: Failure },
}

impl Outcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Applied | Self::WouldApply)
    }
}

/// One result per input item, at the item's index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileResult {
    pub index: usize,
    pub item: ConfigItem,
    pub changed: bool,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Last state read from the device for this slot.
    pub observed: Option<FlatRecord>,
}

impl ReconcileResult {
    fn new(index: usize, item: &ConfigItem, outcome: Outcome, observed: Option<FlatRecord>) -> Self {
        Self {
            index,
            item: item.clone(),
            changed: outcome.changed(),
            outcome,
            observed,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.outcome {
            Outcome::Failed { failure } => Some(failure),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure().is_some()
    }
}

/// Does `response` acknowledge a set on this item's own slot?
///
/// `Set done: ip 35` does not acknowledge slot 3.
pub fn acknowledges(item: &ConfigItem, response: &str) -> bool {
    let pattern = format!(r"Set done:\s+{}\s+{}\b", item.kind(), item.slot());
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .is_ok_and(|re| re.is_match(response))
}

fn failed(failure: Failure) -> Outcome {
    Outcome::Failed { failure }
}

/// Turn a rejected command into a per-item failure; every other transport
/// error still ends the session.
fn split_rejection<T>(
    result: Result<T, ehctl_api::Error>,
) -> Result<Result<T, Failure>, ehctl_api::Error> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(ehctl_api::Error::CommandRejected { command, output }) => {
            warn!(%command, "device rejected command");
            Ok(Err(Failure::Rejected { command, output }))
        }
        Err(err) => Err(err),
    }
}

/// Run one item. The returned record is the last state actually read from
/// the device, whichever step the item stopped at.
fn attempt<B: ItemBackend + ?Sized>(
    backend: &mut B,
    item: &ConfigItem,
    mode: Mode,
) -> Result<(Outcome, Option<FlatRecord>), ehctl_api::Error> {
    let current = match split_rejection(backend.read(item))? {
        Ok(current) => current,
        Err(failure) => return Ok((failed(failure), None)),
    };
    if item.is_satisfied_by(current.as_ref()) {
        debug!(%item, "already in desired state");
        return Ok((Outcome::Unchanged, current));
    }
    if mode == Mode::Check {
        debug!(%item, "would apply");
        return Ok((Outcome::WouldApply, current));
    }

    let response = match split_rejection(backend.apply(item))? {
        Ok(response) => response,
        Err(failure) => return Ok((failed(failure), current)),
    };
    if !acknowledges(item, &response) {
        warn!(%item, response = response.trim(), "set not acknowledged for this slot");
        // The device may have honoured part of the set; report what it holds now.
        let observed = split_rejection(backend.read(item))?.unwrap_or(current);
        return Ok((
            failed(Failure::UnexpectedAcknowledgement {
                response: response.trim().to_owned(),
            }),
            observed,
        ));
    }

    let observed = match split_rejection(backend.read(item))? {
        Ok(observed) => observed,
        Err(failure) => return Ok((failed(failure), current)),
    };
    if item.is_satisfied_by(observed.as_ref()) {
        info!(%item, "applied");
        Ok((Outcome::Applied, observed))
    } else {
        warn!(%item, "verification read does not match");
        let failure = Failure::VerificationMismatch {
            desired: item.desired_record(),
            observed: observed.clone(),
        };
        Ok((failed(failure), observed))
    }
}

/// Reconcile one item.
///
/// Validation failures and commands the device rejects become a failed
/// result; only a lost session is returned as an error.
pub fn reconcile_item<B: ItemBackend + ?Sized>(
    backend: &mut B,
    index: usize,
    item: &ConfigItem,
    mode: Mode,
) -> Result<ReconcileResult, CoreError> {
    if let Err(message) = item.validate() {
        warn!(%item, %message, "invalid item skipped");
        return Ok(ReconcileResult::new(
            index,
            item,
            failed(Failure::Invalid { message }),
            None,
        ));
    }

    let (outcome, observed) = attempt(backend, item, mode)?;
    Ok(ReconcileResult::new(index, item, outcome, observed))
}

/// Reconcile `items` strictly in order, one result per item.
///
/// A failed item does not stop later ones. A transport failure does: the
/// batch ends with [`CoreError::BatchAborted`], which carries the results of
/// every item finished before the failure.
pub fn reconcile_batch<B: ItemBackend + ?Sized>(
    backend: &mut B,
    items: &[ConfigItem],
    mode: Mode,
) -> Result<Vec<ReconcileResult>, CoreError> {
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match reconcile_item(backend, index, item, mode) {
            Ok(result) => results.push(result),
            Err(source) => {
                warn!(completed = results.len(), error = %source, "batch aborted");
                return Err(CoreError::BatchAborted {
                    results,
                    source: Box::new(source),
                });
            }
        }
    }
    Ok(results)
}
