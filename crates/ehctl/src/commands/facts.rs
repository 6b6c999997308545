//! Fact-gathering command handlers (`facts`, `info`).

use ehctl_api::Transport;
use ehctl_core::{DeviceInfo, FactSubset, Facts, Session};

use crate::cli::{FactArg, FactsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

impl From<FactArg> for FactSubset {
    fn from(arg: FactArg) -> Self {
        match arg {
            FactArg::All => Self::All,
            FactArg::System => Self::System,
            FactArg::Software => Self::Software,
            FactArg::Ip => Self::Ip,
            FactArg::Route => Self::Route,
            FactArg::Inventory => Self::Inventory,
            FactArg::Rf => Self::Rf,
            FactArg::Rollback => Self::Rollback,
            FactArg::RunningConfig => Self::RunningConfig,
            FactArg::StartupConfig => Self::StartupConfig,
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

/// One titled section per subset.
fn facts_detail(facts: &Facts) -> String {
    facts
        .iter()
        .map(|(subset, decoded)| {
            let body = output::decoded_table(decoded);
            let body = if body.is_empty() { "(none)".to_owned() } else { body };
            format!("── {subset} ──\n{body}")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn facts_plain(facts: &Facts) -> String {
    facts
        .iter()
        .flat_map(|(subset, decoded)| {
            output::decoded_plain(decoded)
                .lines()
                .map(|line| format!("{subset} {line}"))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn info_detail(info: &DeviceInfo) -> String {
    let show = |value: Option<&str>| value.unwrap_or("-").to_owned();
    [
        format!("Model:    {}", show(info.model.as_deref())),
        format!("Hostname: {}", show(info.hostname.as_deref())),
        format!("Name:     {}", show(info.name.as_deref())),
        format!("Version:  {}", show(info.version.as_deref())),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn handle<T: Transport>(
    session: &mut Session<T>,
    args: FactsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let subsets: Vec<FactSubset> = args.subsets.into_iter().map(FactSubset::from).collect();
    let facts = session.gather(&subsets)?;
    let out = output::render_single(&global.output, &facts, facts_detail, facts_plain);
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn handle_info<T: Transport>(
    session: &mut Session<T>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let info = session.device_info()?;
    let out = output::render_single(&global.output, &info, info_detail, |i| {
        i.model.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
