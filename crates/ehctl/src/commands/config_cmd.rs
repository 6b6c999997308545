//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Optional free-text answer; empty means unset.
fn prompt_optional(prompt: &str) -> Result<Option<String>, CliError> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_owned()))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("ehctl configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let host: String = Input::new()
                .with_prompt("Radio hostname or address")
                .interact_text()
                .map_err(prompt_err)?;

            let port: u16 = Input::new()
                .with_prompt("SSH port")
                .default(22)
                .interact_text()
                .map_err(prompt_err)?;

            let username = prompt_optional("SSH user (empty for ssh default)")?;
            let identity_file =
                prompt_optional("Private key file (empty for ssh default)")?.map(PathBuf::from);

            let profile = Profile {
                host,
                port: (port != 22).then_some(port),
                username,
                identity_file,
                ..Profile::default()
            };
            let ssh = ehctl_config::profile_to_ssh_config(&profile, &cfg.defaults)?;

            let make_default = cfg.profiles.is_empty()
                || Confirm::new()
                    .with_prompt(format!("Use '{profile_name}' as the default profile?"))
                    .default(true)
                    .interact()
                    .map_err(prompt_err)?;
            if make_default {
                cfg.default_profile = Some(profile_name.clone());
            }
            cfg.profiles.insert(profile_name.clone(), profile);

            let path = config::save_config(&cfg)?;
            eprintln!(
                "\n   Profile '{profile_name}' ({}) saved to {}",
                ssh.destination(),
                path.display()
            );
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, show_toml, |c: &Config| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn show_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}
