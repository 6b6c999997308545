// ── `show system` ──

use std::sync::LazyLock;

use crate::model::{FieldKind, FieldTable, FlatRecord};
use crate::parse::{RecordPattern, extract_single};

static PATTERN: LazyLock<RecordPattern> = LazyLock::new(|| RecordPattern::single("system"));

const FIELDS: FieldTable = FieldTable::new(&[
    ("temperature", FieldKind::Int),
    ("cli_timeout", FieldKind::Int),
    ("heartbeat_trap_period", FieldKind::Int),
]);

/// Decode system identity. Every field other than the three counters stays
/// a string.
pub fn decode_system(text: &str) -> FlatRecord {
    extract_single(text, &PATTERN, &FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldValue;

    const SHOW_SYSTEM: &str = "
system description               : EH-8010FX
system snmpid                    : .1.3.6.1.4.1.31926
system uptime                    : 0000:10:38:41
system contact                   : undefined
system name                      : EH-8010FX
system hostname                  : sw
system location                  : undefined
system voltage                   : poe (injector)
system temperature               : 57
system date                      : 2025.11.23
system time                      : 18:05:00
system cli-timeout               : 15
system loop-permission           : mac-swap
system antenna-heater            : disabled
system heartbeat-trap-period     : 0
";

    #[test]
    fn decodes_identity_and_counters() {
        let system = decode_system(SHOW_SYSTEM);
        assert_eq!(system.str("description"), Some("EH-8010FX"));
        assert_eq!(system.str("hostname"), Some("sw"));
        assert_eq!(system.str("voltage"), Some("poe (injector)"));
        assert_eq!(system.str("uptime"), Some("0000:10:38:41"));
        assert_eq!(system.int("temperature"), Some(57));
        assert_eq!(system.int("cli_timeout"), Some(15));
        assert_eq!(system.int("heartbeat_trap_period"), Some(0));
        assert_eq!(system.str("loop_permission"), Some("mac-swap"));
        assert_eq!(system.len(), 15);
    }

    #[test]
    fn unreadable_counter_is_absent() {
        let system = decode_system("system temperature : N/A\nsystem cli-timeout : soon\n");
        assert_eq!(system.value("temperature"), &FieldValue::Absent);
        assert_eq!(system.value("cli_timeout"), &FieldValue::Absent);
    }

    #[test]
    fn other_namespaces_are_ignored() {
        let system = decode_system("rf operational : up\nip 1 vlan : 0\n");
        assert!(system.is_empty());
    }
}
