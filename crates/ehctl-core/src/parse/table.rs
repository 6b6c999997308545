// ── Software bank table ──
//
//   Flash Bank    Version                   Running  Scheduled to run  startup-config
//   1             10.6.0-18451-c009ec33d1   yes      no                exists
//   2             10.8.2-19409-92aead94fe   no       no                missing

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

const HEADER_ANCHOR: &str = "Flash Bank";

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^\s*(\d+)\s+(\S+)\s+(yes|no)\s+(yes|no)\s+(exists|missing)")
        .case_insensitive(true)
        .build()
        .expect("bank row pattern is valid")
});

/// One flash bank row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankRow {
    pub version: String,
    pub bank: u32,
    pub scheduled_to_run: bool,
    /// A startup configuration exists in this bank.
    pub startup_config: bool,
}

/// Banks partitioned by the running flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BankTable {
    pub running: Option<BankRow>,
    pub standby: Option<BankRow>,
}

/// Parse one table row into `(running, row)`.
fn parse_row(line: &str) -> Option<(bool, BankRow)> {
    let caps = ROW.captures(line)?;
    let bank = caps[1].parse().ok()?;
    let row = BankRow {
        version: caps[2].to_owned(),
        bank,
        scheduled_to_run: caps[4].eq_ignore_ascii_case("yes"),
        startup_config: caps[5].eq_ignore_ascii_case("exists"),
    };
    Some((caps[3].eq_ignore_ascii_case("yes"), row))
}

/// Split the bank table into running and standby rows.
///
/// The first row claiming to run wins; later running claims are ignored.
/// Of the rows that do not run, the last one listed is the standby bank.
pub fn extract_table(text: &str) -> BankTable {
    let mut table = BankTable::default();
    for line in text.lines() {
        if line.trim().is_empty() || line.contains(HEADER_ANCHOR) {
            continue;
        }
        let Some((running, row)) = parse_row(line) else {
            continue;
        };
        if !running {
            table.standby = Some(row);
        } else if table.running.is_none() {
            table.running = Some(row);
        } else {
            debug!(bank = row.bank, "second running bank ignored");
        }
    }
    table
}
