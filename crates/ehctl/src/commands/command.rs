//! Raw command execution.

use ehctl_api::Transport;
use ehctl_core::{CommandOutput, Session};

use crate::cli::{CommandArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

fn transcript(outputs: &[CommandOutput]) -> String {
    outputs
        .iter()
        .map(|o| format!("# {}\n{}", o.command, o.output.trim_end()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn handle<T: Transport>(
    session: &mut Session<T>,
    args: CommandArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let outputs = session.run_commands(&args.commands)?;
    let out = output::render_single(&global.output, outputs.as_slice(), transcript, |outputs| {
        outputs
            .iter()
            .map(|o| o.output.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
