//! Rollback-timer command handlers.

use ehctl_api::Transport;
use ehctl_core::{Decoded, RollbackReport, RollbackTarget, Session};

use crate::cli::{GlobalOpts, RollbackArgs, RollbackCommand};
use crate::error::CliError;
use crate::output::{self, Tone};

fn report_detail(report: &RollbackReport, color: bool) -> String {
    let (label, tone) = match (report.is_failed(), report.changed) {
        (true, _) => ("failed", Tone::Bad),
        (false, true) => ("changed", Tone::Changed),
        (false, false) => ("ok", Tone::Muted),
    };
    format!("[{}] {}", output::paint(label, tone, color), report.message)
}

pub fn handle<T: Transport>(
    session: &mut Session<T>,
    args: RollbackArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (target, check) = match args.command {
        RollbackCommand::Status => {
            let status = Decoded::Rollback(session.rollback_status()?);
            let out = output::render_single(
                &global.output,
                &status,
                output::decoded_table,
                output::decoded_plain,
            );
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        RollbackCommand::Set { timeout, check } => (RollbackTarget::Present(timeout), check),
        RollbackCommand::Clear { check } => (RollbackTarget::Absent, check),
    };

    let report = session.set_rollback(target, check)?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| report_detail(r, color),
        |r| r.timeout.map_or_else(|| "inactive".to_owned(), |t| t.to_string()),
    );
    output::print_output(&out, global.quiet);

    match report.failure {
        Some(message) => Err(CliError::RollbackFailed { message }),
        None => Ok(()),
    }
}
