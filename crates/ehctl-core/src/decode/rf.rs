// ── `show rf` ──

use std::sync::LazyLock;

use crate::model::{FieldKind, FieldTable, FlatRecord};
use crate::parse::{RecordPattern, extract_single};

static PATTERN: LazyLock<RecordPattern> = LazyLock::new(|| RecordPattern::single("rf"));

// The modem reports -128 for CINR/RSSI when the link is down. Those pass
// through as numbers.
const FIELDS: FieldTable = FieldTable::new(&[
    ("tx_frequency", FieldKind::Int),
    ("rx_frequency", FieldKind::Int),
    ("channel_width", FieldKind::Int),
    ("tx_mute_timeout", FieldKind::Int),
    ("tx_power", FieldKind::Int),
    ("loopback_timeout", FieldKind::Int),
    ("air_capacity", FieldKind::Int),
    ("cinr", FieldKind::Float),
    ("rssi", FieldKind::Float),
]);

/// Decode radio link status.
pub fn decode_rf(text: &str) -> FlatRecord {
    extract_single(text, &PATTERN, &FIELDS)
}
