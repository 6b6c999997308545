//! Persisting the running configuration.

use ehctl_api::Transport;
use ehctl_core::{SaveReport, Session};

use crate::cli::{GlobalOpts, SaveArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle<T: Transport>(
    session: &mut Session<T>,
    args: SaveArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !args.check
        && !util::confirm(
            "save",
            "Overwrite the startup configuration with the running configuration?",
            global.yes,
        )?
    {
        return Ok(());
    }

    let report = session.save_config(args.check)?;
    let out = output::render_single(
        &global.output,
        &report,
        |r: &SaveReport| r.message.clone(),
        |r| r.saved.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
