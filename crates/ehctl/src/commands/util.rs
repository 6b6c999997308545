//! Shared helpers for command handlers.

use std::io::{IsTerminal, Read};
use std::path::Path;

use ehctl_core::ConfigItem;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, an unconfirmed action is an error rather
/// than a silent "no".
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a capture from `path`, or stdin when `path` is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Parse an items file. YAML is a superset of JSON, so one parser covers
/// both; a bare mapping is accepted as a single item.
pub fn read_items(path: &Path) -> Result<Vec<ConfigItem>, CliError> {
    let invalid = |reason: String| CliError::ItemsFile {
        path: path.display().to_string(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    parse_items(&text).map_err(invalid)
}

fn parse_items(text: &str) -> Result<Vec<ConfigItem>, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    match value {
        serde_yaml::Value::Sequence(_) => serde_yaml::from_value(value).map_err(|e| e.to_string()),
        serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)
            .map(|item| vec![item])
            .map_err(|e| e.to_string()),
        serde_yaml::Value::Null => Ok(Vec::new()),
        _ => Err("expected a list of items".into()),
    }
}
