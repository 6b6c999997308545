// ── `show route [<slot>]` ──

use std::sync::LazyLock;

use crate::model::{FieldKind, FieldTable, RecordSet};
use crate::parse::{RecordPattern, extract_indexed};

static PATTERN: LazyLock<RecordPattern> = LazyLock::new(|| RecordPattern::indexed("route"));

const FIELDS: FieldTable = FieldTable::new(&[("prefix_len", FieldKind::Int)]);

/// Decode per-slot static routes (`dest`, `prefix_len`, `next_hop`).
pub fn decode_route(text: &str) -> RecordSet {
    extract_indexed(text, &PATTERN, &FIELDS)
}
