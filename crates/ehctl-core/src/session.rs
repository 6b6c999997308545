// ── Device session ──
//
// A `Session` owns one transport and is the only thing that talks to the
// device. It screens every response, runs the matching decoder, and
// implements the backends the reconciliation engine and rollback
// controller are generic over.

use ehctl_api::{Transport, terminal};
use tracing::{debug, info};

use crate::decode::{self, Decoded, RollbackStatus};
use crate::error::CoreError;
use crate::facts::{CommandOutput, DeviceInfo, FactSubset, Facts};
use crate::model::{ConfigItem, FlatRecord, ItemKind, RecordSet};
use crate::parse::{BankTable, TreeNode};
use crate::reconcile::{self, ItemBackend, Mode, ReconcileResult};
use crate::rollback::{self, RollbackBackend, RollbackReport, RollbackTarget};

const SAVE_COMMAND: &str = "copy running-configuration startup-configuration";

/// Result of saving the running configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SaveReport {
    pub saved: bool,
    pub message: String,
    /// Device response; `None` in dry-run.
    pub output: Option<String>,
}

/// One CLI session with one device.
pub struct Session<T: Transport> {
    transport: T,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send one command and screen the response for error banners.
    pub fn send(&mut self, command: &str) -> Result<String, ehctl_api::Error> {
        debug!(command, "sending command");
        let output = self.transport.send(command)?;
        terminal::screen(command, output)
    }

    fn query(&mut self, command: &str) -> Result<String, CoreError> {
        Ok(self.send(command)?)
    }

    // ── Fact readers ─────────────────────────────────────────────────

    pub fn system(&mut self) -> Result<FlatRecord, CoreError> {
        Ok(decode::decode_system(&self.query("show system")?))
    }

    pub fn software(&mut self) -> Result<BankTable, CoreError> {
        Ok(decode::decode_software(&self.query("show sw")?))
    }

    /// IP configuration for one slot, or every slot when `slot` is `None`.
    pub fn ip(&mut self, slot: Option<u32>) -> Result<RecordSet, CoreError> {
        let command = scoped("show ip", slot);
        Ok(decode::decode_ip(&self.query(&command)?))
    }

    /// Static routes for one slot, or every slot when `slot` is `None`.
    pub fn route(&mut self, slot: Option<u32>) -> Result<RecordSet, CoreError> {
        let command = scoped("show route", slot);
        Ok(decode::decode_route(&self.query(&command)?))
    }

    pub fn inventory(&mut self) -> Result<Option<TreeNode>, CoreError> {
        Ok(decode::decode_inventory(&self.query("show inventory")?))
    }

    pub fn rf(&mut self) -> Result<FlatRecord, CoreError> {
        Ok(decode::decode_rf(&self.query("show rf")?))
    }

    pub fn rollback_status(&mut self) -> Result<RollbackStatus, CoreError> {
        Ok(decode::decode_rollback(&self.query("show rollback")?))
    }

    pub fn running_config(&mut self) -> Result<String, CoreError> {
        self.fact_text(FactSubset::RunningConfig)
    }

    pub fn startup_config(&mut self) -> Result<String, CoreError> {
        self.fact_text(FactSubset::StartupConfig)
    }

    fn fact_text(&mut self, subset: FactSubset) -> Result<String, CoreError> {
        let command = subset.command().unwrap_or_default();
        Ok(decode::decode_configuration(&self.query(command)?))
    }

    /// Read and decode one subset. `all` decodes to nothing; expand it first.
    pub fn fact(&mut self, subset: FactSubset) -> Result<Option<Decoded>, CoreError> {
        let (Some(command), Some(domain)) = (subset.command(), subset.domain()) else {
            return Ok(None);
        };
        let output = self.query(command)?;
        Ok(Some(decode::decode(domain, &output)))
    }

    /// Gather every requested subset, expanding `all`.
    pub fn gather(&mut self, subsets: &[FactSubset]) -> Result<Facts, CoreError> {
        let mut facts = Facts::default();
        for subset in FactSubset::expand(subsets) {
            if let Some(decoded) = self.fact(subset)? {
                facts.insert(subset, decoded);
            }
        }
        Ok(facts)
    }

    /// Model, names, and running software version.
    pub fn device_info(&mut self) -> Result<DeviceInfo, CoreError> {
        let system = self.system()?;
        let software = self.software()?;
        Ok(DeviceInfo {
            model: system.str("description").map(str::to_owned),
            hostname: system.str("hostname").map(str::to_owned),
            name: system.str("name").map(str::to_owned),
            version: software.running.map(|bank| bank.version),
        })
    }

    /// Run raw commands in order and return their outputs.
    ///
    /// The first command the device rejects stops the run.
    pub fn run_commands(&mut self, commands: &[String]) -> Result<Vec<CommandOutput>, CoreError> {
        commands
            .iter()
            .map(|command| {
                Ok(CommandOutput {
                    command: command.clone(),
                    output: self.query(command)?,
                })
            })
            .collect()
    }

    /// Copy the running configuration to startup.
    pub fn save_config(&mut self, dry_run: bool) -> Result<SaveReport, CoreError> {
        if dry_run {
            return Ok(SaveReport {
                saved: false,
                message: format!("Configuration save skipped, would execute: {SAVE_COMMAND}"),
                output: None,
            });
        }
        let output = self.query(SAVE_COMMAND)?;
        let lower = output.to_lowercase();
        if lower.contains("error") || lower.contains("failed") {
            return Err(CoreError::UnexpectedResponse {
                command: SAVE_COMMAND.to_owned(),
                response: output.trim().to_owned(),
            });
        }
        info!("running configuration saved");
        Ok(SaveReport {
            saved: true,
            message: "Configuration saved successfully".to_owned(),
            output: Some(output),
        })
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn reconcile_batch(
        &mut self,
        items: &[ConfigItem],
        mode: Mode,
    ) -> Result<Vec<ReconcileResult>, CoreError> {
        reconcile::reconcile_batch(self, items, mode)
    }

    pub fn set_rollback(
        &mut self,
        target: RollbackTarget,
        dry_run: bool,
    ) -> Result<RollbackReport, CoreError> {
        rollback::set_rollback(self, target, dry_run)
    }
}

fn scoped(command: &str, slot: Option<u32>) -> String {
    match slot {
        Some(slot) => format!("{command} {slot}"),
        None => command.to_owned(),
    }
}

impl<T: Transport> ItemBackend for Session<T> {
    fn read(&mut self, item: &ConfigItem) -> Result<Option<FlatRecord>, ehctl_api::Error> {
        let output = self.send(&item.show_command())?;
        let mut records = match item.kind() {
            ItemKind::Ip => decode::decode_ip(&output),
            ItemKind::Route => decode::decode_route(&output),
        };
        Ok(records.shift_remove(&item.slot()))
    }

    fn apply(&mut self, item: &ConfigItem) -> Result<String, ehctl_api::Error> {
        self.send(&item.set_command())
    }
}

impl<T: Transport> RollbackBackend for Session<T> {
    fn status(&mut self) -> Result<RollbackStatus, ehctl_api::Error> {
        Ok(decode::decode_rollback(&self.send("show rollback")?))
    }

    fn arm(&mut self, timeout: u32) -> Result<String, ehctl_api::Error> {
        self.send(&format!("set rollback timeout {timeout}"))
    }

    fn clear(&mut self) -> Result<String, ehctl_api::Error> {
        self.send("clear rollback")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ehctl_api::ScriptedTransport;

    use super::*;

    #[test]
    fn error_banner_surfaces_as_rejection() {
        let transport = ScriptedTransport::new().respond("show rf", "% Error: unknown command");
        let mut session = Session::new(transport);
        let err = session.rf().unwrap_err();
        assert!(matches!(err, CoreError::CommandRejected { .. }));
    }

    #[test]
    fn slot_reads_are_scoped() {
        let transport = ScriptedTransport::new()
            .respond("show ip 2", "ip 2 ip-addr : 10.0.0.2\nip 2 prefix-len : 24\n");
        let mut session = Session::new(transport);
        let ip = session.ip(Some(2)).unwrap();
        assert_eq!(ip[&2].str("ip"), Some("10.0.0.2"));
        assert_eq!(session.transport().sent(), ["show ip 2"]);
    }

    #[test]
    fn item_read_ignores_other_slots() {
        let transport = ScriptedTransport::new().respond("show route 1", "route 2 dest : 10.0.0.0\n");
        let mut session = Session::new(transport);
        let item = ConfigItem::route(1, "10.0.0.0", 8, "10.0.0.1");
        assert_eq!(ItemBackend::read(&mut session, &item).unwrap(), None);
    }

    #[test]
    fn dry_run_save_sends_nothing() {
        let mut session = Session::new(ScriptedTransport::new());
        let report = session.save_config(true).unwrap();
        assert!(!report.saved);
        assert!(session.transport().sent().is_empty());
    }

    #[test]
    fn save_failure_is_detected() {
        let transport = ScriptedTransport::new().respond(SAVE_COMMAND, "Copy failed: flash busy");
        let mut session = Session::new(transport);
        let err = session.save_config(false).unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedResponse { .. }));
    }
}
