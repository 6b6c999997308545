//! Reconciliation of desired IP and route items.

use ehctl_api::Transport;
use ehctl_core::{CoreError, Decoded, Mode, Outcome, ReconcileResult, RecordSet, Session};
use indexmap::IndexMap;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ApplyArgs, GlobalOpts, OutputFormat, ShowKind, ShowTarget};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn tone(outcome: &Outcome) -> Tone {
    match outcome {
        Outcome::Unchanged => Tone::Muted,
        Outcome::Applied => Tone::Good,
        Outcome::WouldApply => Tone::Changed,
        Outcome::Failed { .. } => Tone::Bad,
    }
}

fn row(result: &ReconcileResult, color: bool) -> ResultRow {
    ResultRow {
        index: result.index,
        item: result.item.to_string(),
        status: output::paint(&result.outcome.to_string(), tone(&result.outcome), color),
        detail: result.failure().map(ToString::to_string).unwrap_or_default(),
    }
}

fn line(result: &ReconcileResult) -> String {
    format!("{} {} {}", result.index, result.outcome, result.item)
}

// ── Post-apply reads ────────────────────────────────────────────────

/// A `--show` read: the decoded slots, or why they could not be read.
#[derive(Serialize)]
#[serde(untagged)]
enum ShowRead {
    Records(RecordSet),
    Error { error: String },
}

#[derive(Serialize)]
struct ApplyReport<'a> {
    results: &'a [ReconcileResult],
    show: &'a IndexMap<String, ShowRead>,
}

/// Run every `--show` read in order. A rejected read is recorded against its
/// key; a lost session stops the reads and is returned alongside them.
fn read_back<T: Transport>(
    session: &mut Session<T>,
    targets: &[ShowTarget],
) -> (IndexMap<String, ShowRead>, Option<CliError>) {
    let mut reads = IndexMap::new();
    for target in targets {
        let read = match target.kind {
            ShowKind::Ip => session.ip(target.slot),
            ShowKind::Route => session.route(target.slot),
        };
        match read {
            Ok(records) => {
                reads.insert(target.to_string(), ShowRead::Records(records));
            }
            Err(err) => {
                let fatal = err.is_transport();
                reads.insert(
                    target.to_string(),
                    ShowRead::Error {
                        error: err.to_string(),
                    },
                );
                if fatal {
                    return (reads, Some(err.into()));
                }
            }
        }
    }
    (reads, None)
}

fn report_detail(report: &ApplyReport<'_>, color: bool) -> String {
    let mut sections = vec![output::render_list(
        &OutputFormat::Table,
        report.results,
        |r| row(r, color),
        line,
    )];
    for (key, read) in report.show {
        let body = match read {
            ShowRead::Records(records) => output::decoded_table(&Decoded::Records(records.clone())),
            ShowRead::Error { error } => output::paint(error, Tone::Bad, color),
        };
        let body = if body.is_empty() { "(none)".to_owned() } else { body };
        sections.push(format!("── {key} ──\n{body}"));
    }
    sections.join("\n\n")
}

fn report_plain(report: &ApplyReport<'_>) -> String {
    let results = report.results.iter().map(line);
    let reads = report.show.iter().flat_map(|(key, read)| match read {
        ShowRead::Records(records) => output::decoded_plain(&Decoded::Records(records.clone()))
            .lines()
            .map(|text| format!("{key}: {text}"))
            .collect::<Vec<_>>(),
        ShowRead::Error { error } => vec![format!("{key}: error {error}")],
    });
    results.chain(reads).collect::<Vec<_>>().join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle<T: Transport>(
    session: &mut Session<T>,
    args: ApplyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let items = util::read_items(&args.file)?;
    let mode = if args.check { Mode::Check } else { Mode::Apply };
    tracing::debug!(count = items.len(), ?mode, "reconciling items");

    // A lost session still reports the items finished before it.
    let (results, aborted) = match session.reconcile_batch(&items, mode) {
        Ok(results) => (results, None),
        Err(CoreError::BatchAborted { results, source }) => {
            let err = CliError::BatchAborted {
                completed: results.len(),
                reason: source.to_string(),
            };
            (results, Some(err))
        }
        Err(err) => return Err(err.into()),
    };

    let (reads, read_error) = if aborted.is_none() {
        read_back(session, &args.show)
    } else {
        (IndexMap::new(), None)
    };

    let color = output::should_color(&global.color);
    let out = if args.show.is_empty() {
        output::render_list(&global.output, &results, |r| row(r, color), line)
    } else {
        let report = ApplyReport {
            results: &results,
            show: &reads,
        };
        output::render_single(
            &global.output,
            &report,
            |r: &ApplyReport<'_>| report_detail(r, color),
            report_plain,
        )
    };
    output::print_output(&out, global.quiet);

    if let Some(err) = aborted.or(read_error) {
        return Err(err);
    }

    let failed = results.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        return Err(CliError::ItemsFailed {
            failed,
            total: results.len(),
        });
    }
    if !global.quiet {
        let changed = results.iter().filter(|r| r.changed).count();
        let verb = if args.check { "would change" } else { "changed" };
        eprintln!("{changed} of {} item(s) {verb}", results.len());
    }
    Ok(())
}
