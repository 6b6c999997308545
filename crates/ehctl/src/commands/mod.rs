//! Command handlers, one module per top-level subcommand.

pub mod apply;
pub mod command;
pub mod config_cmd;
pub mod decode;
pub mod facts;
pub mod rollback;
pub mod save;
pub mod util;

use ehctl_api::Transport;
use ehctl_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device command to its handler.
pub fn dispatch<T: Transport>(
    cmd: Command,
    session: &mut Session<T>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Facts(args) => facts::handle(session, args, global),
        Command::Info => facts::handle_info(session, global),
        Command::Command(args) => command::handle(session, args, global),
        Command::Apply(args) => apply::handle(session, args, global),
        Command::Rollback(args) => rollback::handle(session, args, global),
        Command::Save(args) => save::handle(session, args, global),
        // Offline commands are handled before a session is opened
        Command::Decode(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
