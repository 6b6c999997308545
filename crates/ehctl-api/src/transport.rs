// ── Blocking CLI transports ──
//
// The EH CLI is strictly request-then-response: one command out, one block
// of text back. `Transport` captures exactly that and nothing more; session
// setup, retries and reconnection belong to the implementation.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::Error;

/// A blocking "send command, receive text" channel to one device.
pub trait Transport {
    /// Send one CLI command and wait for its complete response.
    fn send(&mut self, command: &str) -> Result<String, Error>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, command: &str) -> Result<String, Error> {
        (**self).send(command)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, command: &str) -> Result<String, Error> {
        (**self).send(command)
    }
}

/// Connection settings for [`SshTransport`].
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Device hostname or IP address.
    pub host: String,
    pub port: u16,
    /// Login user; `None` lets the ssh client pick (ssh_config, `$USER`).
    pub username: Option<String>,
    /// Private key passed with `-i`.
    pub identity_file: Option<PathBuf>,
    /// The ssh client binary.
    pub program: String,
    /// Extra `-o` style options, passed through verbatim.
    pub extra_args: Vec<String>,
    pub connect_timeout: Duration,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 22,
            username: None,
            identity_file: None,
            program: "ssh".into(),
            extra_args: Vec::new(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl SshConfig {
    /// `user@host`, or just `host` when no user is configured.
    pub fn destination(&self) -> String {
        match &self.username {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }

    /// Full argument vector for one remote command (excluding the program).
    pub fn args_for(&self, command: &str) -> Vec<String> {
        let mut args = vec![
            "-p".to_owned(),
            self.port.to_string(),
            "-o".to_owned(),
            "BatchMode=yes".to_owned(),
            "-o".to_owned(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
        ];
        if let Some(ref key) = self.identity_file {
            args.push("-i".to_owned());
            args.push(key.display().to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push(self.destination());
        args.push(command.to_owned());
        args
    }
}

/// Runs every command through the system ssh client in batch mode.
///
/// Each call is an independent exec channel, so there is no shell state to
/// keep in sync and no prompt to detect.
#[derive(Debug, Clone)]
pub struct SshTransport {
    config: SshConfig,
}

/// ssh's own exit status for "could not talk to the remote side".
const SSH_CONNECTION_ERROR: i32 = 255;

impl SshTransport {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }
}

impl Transport for SshTransport {
    fn send(&mut self, command: &str) -> Result<String, Error> {
        debug!(host = %self.config.host, command, "sending command over ssh");

        let output = Command::new(&self.config.program)
            .args(self.config.args_for(command))
            .output()
            .map_err(|source| Error::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        trace!(status = ?output.status.code(), bytes = stdout.len(), "ssh exchange finished");

        match output.status.code() {
            Some(0) => Ok(stdout),
            Some(SSH_CONNECTION_ERROR) => Err(Error::ConnectionFailed {
                host: self.config.destination(),
                reason: stderr,
            }),
            Some(_) => Err(Error::CommandRejected {
                command: command.to_owned(),
                output: if stderr.is_empty() { stdout } else { stderr },
            }),
            None => Err(Error::ConnectionLost {
                reason: "ssh client terminated by signal".into(),
            }),
        }
    }
}
