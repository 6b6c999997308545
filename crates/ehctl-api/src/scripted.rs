// ── Scripted transport ──
//
// Replays canned device output. Used for offline runs against captured
// sessions (`--replay`) and as the device double in tests. Every command is
// recorded so callers can assert exactly what was sent.

use std::collections::VecDeque;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::transport::Transport;

/// One replay entry: a single response, or a sequence consumed in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayEntry {
    One(String),
    Many(Vec<String>),
}

/// Transport that answers from a per-command script.
///
/// Each command owns a queue of responses. Responses are consumed front to
/// back; the last one repeats forever, so a single scripted answer behaves
/// like a device whose state never changes.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: IndexMap<String, VecDeque<String>>,
    sent: Vec<String>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `response` as the next answer to `command`.
    pub fn respond(mut self, command: impl Into<String>, response: impl Into<String>) -> Self {
        self.push(command, response);
        self
    }

    /// Queue `response` as the next answer to `command` (by reference).
    pub fn push(&mut self, command: impl Into<String>, response: impl Into<String>) {
        self.script
            .entry(normalize_command(&command.into()))
            .or_default()
            .push_back(response.into());
    }

    /// Parse a YAML replay document: a map of command to response (or list
    /// of responses).
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let entries: IndexMap<String, ReplayEntry> =
            serde_yaml::from_str(yaml).map_err(|e| Error::Replay {
                path: "<inline>".into(),
                reason: e.to_string(),
            })?;

        let mut transport = Self::new();
        for (command, entry) in entries {
            match entry {
                ReplayEntry::One(response) => transport.push(command, response),
                ReplayEntry::Many(responses) => {
                    for response in responses {
                        transport.push(command.clone(), response);
                    }
                }
            }
        }
        Ok(transport)
    }

    /// Load a YAML replay file from disk.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::Replay {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&yaml).map_err(|err| match err {
            Error::Replay { reason, .. } => Error::Replay {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Every command sent so far, in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// How many times `command` has been sent.
    pub fn count(&self, command: &str) -> usize {
        let wanted = normalize_command(command);
        self.sent.iter().filter(|c| **c == wanted).count()
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, command: &str) -> Result<String, Error> {
        let key = normalize_command(command);
        self.sent.push(key.clone());

        let queue = self
            .script
            .get_mut(&key)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| Error::Unscripted {
                command: key.clone(),
            })?;

        let response = if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        };
        debug!(command = %key, bytes = response.len(), "scripted response");
        Ok(response)
    }
}

/// Collapse runs of whitespace so `show  ip 3` and `show ip 3` are one key.
fn normalize_command(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn last_response_repeats() {
        let mut t = ScriptedTransport::new()
            .respond("show ip 3", "first")
            .respond("show ip 3", "second");

        assert_eq!(t.send("show ip 3").unwrap(), "first");
        assert_eq!(t.send("show ip 3").unwrap(), "second");
        assert_eq!(t.send("show  ip   3").unwrap(), "second");
        assert_eq!(t.count("show ip 3"), 3);
    }

    #[test]
    fn unscripted_command_is_error() {
        let mut t = ScriptedTransport::new();
        let err = t.send("show rf").unwrap_err();
        assert!(matches!(err, Error::Unscripted { ref command } if command == "show rf"));
        assert_eq!(t.sent(), ["show rf"]);
    }

    #[test]
    fn yaml_accepts_single_and_sequence_entries() {
        let yaml = r#"
"show rollback": "rollback timeout : not started"
"show ip 1":
  - "ip 1 ip-addr : static 10.0.0.1"
  - "ip 1 ip-addr : static 10.0.0.2"
"#;
        let mut t = ScriptedTransport::from_yaml(yaml).unwrap();
        assert_eq!(
            t.send("show rollback").unwrap(),
            "rollback timeout : not started"
        );
        assert_eq!(t.send("show ip 1").unwrap(), "ip 1 ip-addr : static 10.0.0.1");
        assert_eq!(t.send("show ip 1").unwrap(), "ip 1 ip-addr : static 10.0.0.2");
    }

    #[test]
    fn malformed_yaml_is_replay_error() {
        let err = ScriptedTransport::from_yaml("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, Error::Replay { .. }));
    }
}
