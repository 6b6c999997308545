//! Clap derive structures for the `ehctl` CLI.
//!
//! Defines the command tree, global flags, and the value enums the
//! handlers map onto core types.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ehctl -- inspect and configure EtherHaul radios over their CLI
#[derive(Debug, Parser)]
#[command(
    name = "ehctl",
    version,
    about = "Inspect and configure EtherHaul radios from the command line",
    long_about = "Reads the colon-delimited text CLI of Siklu EtherHaul radios, decodes it\n\
        into typed facts, and applies IP, route and rollback-timer changes with\n\
        read-back verification.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "EHCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device hostname or address (overrides profile)
    #[arg(long, short = 'H', env = "EHCTL_HOST", global = true)]
    pub host: Option<String>,

    /// SSH login user (overrides profile)
    #[arg(long, short = 'u', env = "EHCTL_USER", global = true)]
    pub user: Option<String>,

    /// SSH port (overrides profile)
    #[arg(long, env = "EHCTL_PORT", global = true)]
    pub port: Option<u16>,

    /// Answer device commands from a YAML capture instead of a live session
    #[arg(long, env = "EHCTL_REPLAY", global = true, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EHCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gather decoded facts from the device
    #[command(alias = "f")]
    Facts(FactsArgs),

    /// Show model, names and running software version
    Info,

    /// Decode a captured command output offline
    Decode(DecodeArgs),

    /// Run raw CLI commands and print their output
    #[command(alias = "cmd")]
    Command(CommandArgs),

    /// Reconcile IP and route items from a YAML or JSON file
    Apply(ApplyArgs),

    /// Inspect or drive the configuration rollback timer
    Rollback(RollbackArgs),

    /// Copy the running configuration to startup
    Save(SaveArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Facts ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FactArg {
    /// Every typed subset (excludes configuration dumps)
    All,
    System,
    Software,
    Ip,
    Route,
    Inventory,
    Rf,
    Rollback,
    RunningConfig,
    StartupConfig,
}

#[derive(Debug, Args)]
pub struct FactsArgs {
    /// Subsets to gather
    #[arg(value_enum, default_value = "all")]
    pub subsets: Vec<FactArg>,
}

// ── Decode ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DomainArg {
    /// `show system`
    System,
    /// `show sw`
    Software,
    /// `show ip`
    Ip,
    /// `show route`
    Route,
    /// `show inventory`
    Inventory,
    /// `show rf`
    Rf,
    /// `show rollback`
    Rollback,
    /// `copy ... display`
    Configuration,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Which command produced the capture
    #[arg(value_enum)]
    pub domain: DomainArg,

    /// Capture file; reads stdin when omitted or `-`
    pub file: Option<PathBuf>,
}

// ── Command ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CommandArgs {
    /// Commands to run, in order (quote each one)
    #[arg(required = true, num_args = 1..)]
    pub commands: Vec<String>,
}

// ── Apply ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Items file (YAML or JSON list of `type: ip|route` entries)
    pub file: PathBuf,

    /// Compare only; report what would change without sending set commands
    #[arg(long)]
    pub check: bool,

    /// Read back IP or route state afterwards (`ip`, `ip:3`, `route:1`); repeatable
    #[arg(long = "show", value_name = "KIND[:SLOT]")]
    pub show: Vec<ShowTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowKind {
    Ip,
    Route,
}

/// A post-apply read: every slot of a kind, or one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowTarget {
    pub kind: ShowKind,
    pub slot: Option<u32>,
}

impl fmt::Display for ShowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ShowKind::Ip => "ip",
            ShowKind::Route => "route",
        };
        match self.slot {
            Some(slot) => write!(f, "{kind} {slot}"),
            None => f.write_str(kind),
        }
    }
}

impl FromStr for ShowTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, slot) = match s.split_once(':') {
            Some((kind, slot)) => (kind, Some(slot)),
            None => (s, None),
        };
        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "ip" => ShowKind::Ip,
            "route" => ShowKind::Route,
            other => return Err(format!("unknown kind '{other}' (expected ip or route)")),
        };
        let slot = slot
            .map(|slot| {
                slot.trim()
                    .parse::<u32>()
                    .map_err(|_| format!("slot must be a non-negative integer (got '{slot}')"))
            })
            .transpose()?;
        Ok(Self { kind, slot })
    }
}

// ── Rollback ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RollbackArgs {
    #[command(subcommand)]
    pub command: RollbackCommand,
}

#[derive(Debug, Subcommand)]
pub enum RollbackCommand {
    /// Show whether the timer is running
    Status,

    /// Arm the timer (or change its timeout)
    Set {
        /// Seconds before the running configuration is reverted
        timeout: u32,

        /// Report what would change without sending it
        #[arg(long)]
        check: bool,
    },

    /// Stop the timer, keeping the current configuration
    Clear {
        /// Report what would change without sending it
        #[arg(long)]
        check: bool,
    },
}

// ── Save ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Report the command without sending it
    #[arg(long)]
    pub check: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a device profile with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
