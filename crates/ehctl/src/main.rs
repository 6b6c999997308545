mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use ehctl_core::Session;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Offline commands never touch a device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Decode(args) => commands::decode::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "ehctl", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let transport = config::open_transport(&cli.global)?;
            let mut session = Session::new(transport);

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &mut session, &cli.global)
        }
    }
}
