//! Offline decoding of captured command output.

use ehctl_core::{Domain, decode};

use crate::cli::{DecodeArgs, DomainArg, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::System => Self::System,
            DomainArg::Software => Self::Software,
            DomainArg::Ip => Self::Ip,
            DomainArg::Route => Self::Route,
            DomainArg::Inventory => Self::Inventory,
            DomainArg::Rf => Self::Rf,
            DomainArg::Rollback => Self::Rollback,
            DomainArg::Configuration => Self::Configuration,
        }
    }
}

pub fn handle(args: DecodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let text = util::read_input(args.file.as_deref())?;
    let domain = Domain::from(args.domain);
    tracing::debug!(%domain, bytes = text.len(), "decoding capture");

    let decoded = decode(domain, &text);
    let out = output::render_single(
        &global.output,
        &decoded,
        output::decoded_table,
        output::decoded_plain,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
