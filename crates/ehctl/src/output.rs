//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits `key=value` style lines for
//! scripting.

use std::io::{self, IsTerminal, Write};

use ehctl_core::{BankTable, Decoded, FlatRecord, RecordSet, RollbackStatus, TreeNode};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// How a status cell should read at a glance.
#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Good,
    Changed,
    Bad,
    Muted,
}

pub fn paint(text: &str, tone: Tone, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match tone {
        Tone::Good => text.green().to_string(),
        Tone::Changed => text.yellow().to_string(),
        Tone::Bad => text.red().bold().to_string(),
        Tone::Muted => text.dimmed().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `line_fn` on each item to emit one line per item
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    line_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&line_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views don't use the
/// `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => plain_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_grid(builder: Builder) -> String {
    builder.build().with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(data).expect("serialization should not fail")
    } else {
        serde_json::to_string_pretty(data).expect("serialization should not fail")
    }
}

/// YAML output.
fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

// ── Decoded facts ────────────────────────────────────────────────────

/// Table view of any decoder output.
pub fn decoded_table(decoded: &Decoded) -> String {
    match decoded {
        Decoded::Record(record) => record_table(record),
        Decoded::Records(records) => records_table(records),
        Decoded::Banks(banks) => banks_table(banks),
        Decoded::Inventory(root) => inventory_table(root.as_ref()),
        Decoded::Rollback(status) => rollback_line(*status),
        Decoded::Text(text) => text.clone(),
    }
}

/// Line-oriented view of any decoder output.
pub fn decoded_plain(decoded: &Decoded) -> String {
    match decoded {
        Decoded::Record(record) => record
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Decoded::Records(records) => records
            .iter()
            .map(|(slot, record)| {
                let fields: Vec<String> = record
                    .iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .collect();
                format!("{slot} {}", fields.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Decoded::Banks(banks) => [("running", &banks.running), ("standby", &banks.standby)]
            .into_iter()
            .filter_map(|(role, row)| row.as_ref().map(|row| format!("{role} {}", row.version)))
            .collect::<Vec<_>>()
            .join("\n"),
        Decoded::Inventory(root) => root
            .iter()
            .flat_map(|root| indented(root, 0))
            .map(|(depth, node)| format!("{}{}", "  ".repeat(depth), node.id))
            .collect::<Vec<_>>()
            .join("\n"),
        Decoded::Rollback(status) => status
            .timeout
            .filter(|_| status.active)
            .map_or_else(|| "inactive".to_owned(), |t| t.to_string()),
        Decoded::Text(text) => text.clone(),
    }
}

fn record_table(record: &FlatRecord) -> String {
    if record.is_empty() {
        return String::new();
    }
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, value) in record.iter() {
        builder.push_record([key.to_owned(), value.to_string()]);
    }
    render_grid(builder)
}

/// One row per slot; columns are the union of every slot's fields.
fn records_table(records: &RecordSet) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut columns: Vec<&str> = Vec::new();
    for record in records.values() {
        for (key, _) in record.iter() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(std::iter::once("slot").chain(columns.iter().copied()));
    for (slot, record) in records {
        let cells = columns.iter().map(|key| record.value(key).to_string());
        builder.push_record(std::iter::once(slot.to_string()).chain(cells));
    }
    render_grid(builder)
}

#[derive(Tabled)]
struct BankRowView {
    #[tabled(rename = "Role")]
    role: &'static str,
    #[tabled(rename = "Bank")]
    bank: u32,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Scheduled")]
    scheduled: bool,
    #[tabled(rename = "Startup Config")]
    startup_config: bool,
}

fn banks_table(banks: &BankTable) -> String {
    let rows: Vec<BankRowView> = [("running", &banks.running), ("standby", &banks.standby)]
        .into_iter()
        .filter_map(|(role, row)| {
            row.as_ref().map(|row| BankRowView {
                role,
                bank: row.bank,
                version: row.version.clone(),
                scheduled: row.scheduled_to_run,
                startup_config: row.startup_config,
            })
        })
        .collect();
    if rows.is_empty() {
        return String::new();
    }
    render_table(&rows)
}

fn indented(node: &TreeNode, depth: usize) -> Vec<(usize, &TreeNode)> {
    let mut out = vec![(depth, node)];
    for child in &node.components {
        out.extend(indented(child, depth + 1));
    }
    out
}

fn inventory_table(root: Option<&TreeNode>) -> String {
    let Some(root) = root else {
        return String::new();
    };
    let mut builder = Builder::default();
    builder.push_record(["Component", "Class", "Description", "Serial", "HW Rev"]);
    for (depth, node) in indented(root, 0) {
        let field = |key: &str| node.record.value(key).to_string();
        builder.push_record([
            format!("{}{}", "  ".repeat(depth), node.id),
            field("class"),
            field("desc"),
            field("serial"),
            field("hw_rev"),
        ]);
    }
    render_grid(builder)
}

fn rollback_line(status: RollbackStatus) -> String {
    match (status.active, status.timeout) {
        (true, Some(timeout)) => format!("Rollback active with {timeout} second timeout"),
        _ => "Rollback not active".to_owned(),
    }
}
