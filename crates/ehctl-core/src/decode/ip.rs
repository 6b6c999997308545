// ── `show ip [<slot>]` ──

use std::sync::LazyLock;

use crate::model::{FieldKind, FieldTable, FieldValue, FlatRecord, RecordSet, normalize};
use crate::parse::{RecordPattern, extract_indexed};

static PATTERN: LazyLock<RecordPattern> = LazyLock::new(|| RecordPattern::indexed("ip"));

const FIELDS: FieldTable = FieldTable::new(&[
    ("prefix_len", FieldKind::Int),
    ("vlan", FieldKind::Int),
]);

/// Address qualifier the device prints in front of statically assigned
/// addresses (`ip 1 ip-addr : static 192.168.0.1`).
const STATIC_QUALIFIER: &str = "static";

/// Decode per-slot IP configuration.
///
/// The device's `ip-addr` field is exposed as `ip`, without its `static`
/// qualifier, so an observed record compares directly against a desired
/// item.
pub fn decode_ip(text: &str) -> RecordSet {
    extract_indexed(text, &PATTERN, &FIELDS)
        .into_iter()
        .map(|(slot, record)| (slot, rename_address(record)))
        .collect()
}

fn rename_address(record: FlatRecord) -> FlatRecord {
    record
        .into_iter()
        .map(|(key, value)| {
            if key == "ip_addr" {
                ("ip".to_owned(), strip_qualifier(value))
            } else {
                (key, value)
            }
        })
        .collect()
}

fn strip_qualifier(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Str(text) => {
            let address = match text.strip_prefix(STATIC_QUALIFIER) {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
                _ => text.as_str(),
            };
            normalize(address).map_or(FieldValue::Absent, FieldValue::from)
        }
        other => other,
    }
}
