//! CLI configuration -- thin wrapper around `ehctl_config` shared types.
//!
//! Re-exports the shared types and adds transport resolution that respects
//! `GlobalOpts` flag overrides (--host, --user, --port, --replay).

use ehctl_api::{ScriptedTransport, SshConfig, SshTransport, Transport};
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ehctl_config::{
    Config, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate the active profile + global flags into an `SshConfig`.
///
/// Flag overrides take priority over profile values. Without a matching
/// profile, `--host` alone is enough; an explicit `--profile` that does not
/// exist is an error.
pub fn resolve_ssh_config(global: &GlobalOpts, config: &Config) -> Result<SshConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None if global.host.is_some() => Profile::default(),
        None => {
            return Err(CliError::NoDevice {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref user) = global.user {
        profile.username = Some(user.clone());
    }
    if let Some(port) = global.port {
        profile.port = Some(port);
    }

    Ok(ehctl_config::profile_to_ssh_config(&profile, &config.defaults)?)
}

/// Open the transport every device command goes through.
///
/// `--replay` wins over any profile; otherwise a live SSH transport is built
/// from the resolved configuration.
pub fn open_transport(global: &GlobalOpts) -> Result<Box<dyn Transport>, CliError> {
    if let Some(ref path) = global.replay {
        debug!(path = %path.display(), "replaying captured session");
        return Ok(Box::new(ScriptedTransport::from_file(path)?));
    }

    let config = load_config()?;
    let ssh = resolve_ssh_config(global, &config)?;
    debug!(destination = %ssh.destination(), port = ssh.port, "using ssh transport");
    Ok(Box::new(SshTransport::new(ssh)))
}

fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
