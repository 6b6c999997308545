// ── `show sw` ──

use crate::parse::{BankTable, extract_table};

/// Decode the flash bank table into running and standby banks.
pub fn decode_software(text: &str) -> BankTable {
    extract_table(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_device_table() {
        let text = "\
Flash Bank    Version                           Running     Scheduled to run    startup-config
1             10.6.0-18451-c009ec33d1           yes         no                  exists
2             10.8.2-19409-92aead94fe           no          no                  missing
";
        let banks = decode_software(text);
        let running = banks.running.unwrap_or_else(|| panic!("no running bank"));
        assert_eq!(running.version, "10.6.0-18451-c009ec33d1");
        assert_eq!(running.bank, 1);
        assert!(!running.scheduled_to_run);
        assert!(running.startup_config);

        let standby = banks.standby.unwrap_or_else(|| panic!("no standby bank"));
        assert_eq!(standby.version, "10.8.2-19409-92aead94fe");
        assert!(!standby.startup_config);
    }
}
