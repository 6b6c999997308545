//! Transport layer for EtherHaul (EH) radios.
//!
//! The device exposes a colon-delimited text CLI and nothing else. This crate
//! moves command text to the device and response text back; it never
//! interprets the output beyond screening for error banners.
//!
//! - [`Transport`]: the blocking request/response seam used by `ehctl-core`.
//! - [`SshTransport`]: one `ssh` exec channel per command.
//! - [`ScriptedTransport`]: canned responses for replay and tests.

pub mod error;
pub mod scripted;
pub mod terminal;
pub mod transport;

pub use error::Error;
pub use scripted::ScriptedTransport;
pub use transport::{SshConfig, SshTransport, Transport};
