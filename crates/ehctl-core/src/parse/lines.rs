// ── Line-record extractor ──
//
// The EH CLI prints state as `<namespace> [<id>] <key> : <value>` lines.
// This module finds those lines, normalizes keys (`-` → `_`), and groups
// them into records by identity. Lines that do not match are skipped.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::model::{FieldTable, FieldValue, FlatRecord, RecordSet, normalize};

/// Compiled grammar for one namespace.
#[derive(Debug, Clone)]
pub struct RecordPattern {
    namespace: String,
    indexed: bool,
    regex: Regex,
}

/// One matched line before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField<'a> {
    pub id: Option<u32>,
    pub key: String,
    pub value: &'a str,
}

impl RecordPattern {
    /// `<namespace> <key> : <value>`: one implicit record.
    pub fn single(namespace: &str) -> Self {
        Self::build(namespace, false)
    }

    /// `<namespace> <id> <key> : <value>`: records keyed by `id`.
    pub fn indexed(namespace: &str) -> Self {
        Self::build(namespace, true)
    }

    fn build(namespace: &str, indexed: bool) -> Self {
        let id = if indexed { r"(?P<id>\d+)\s+" } else { "" };
        let pattern = format!(
            r"^{ns}\s+{id}(?P<key>[^\s:]+)\s*:\s*(?P<value>.*)$",
            ns = regex::escape(namespace),
        );
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .expect("escaped namespace always forms a valid pattern");
        Self {
            namespace: namespace.to_owned(),
            indexed,
            regex,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Match one (already trimmed) line.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<RawField<'a>> {
        let caps = self.regex.captures(line)?;
        let id = if self.indexed {
            let digits = caps.name("id")?.as_str();
            match digits.parse::<u32>() {
                Ok(id) => Some(id),
                Err(_) => {
                    debug!(namespace = %self.namespace, digits, "identity out of range, line skipped");
                    return None;
                }
            }
        } else {
            None
        };
        let key = caps.name("key")?.as_str().replace('-', "_");
        let value = caps.name("value").map_or("", |m| m.as_str());
        Some(RawField { id, key, value })
    }

    /// Every matching line in `text`, in order. Blank and `#` comment lines
    /// are skipped before matching.
    pub fn scan<'a>(&'a self, text: &'a str) -> impl Iterator<Item = RawField<'a>> + 'a {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| self.match_line(line))
    }
}

/// Coerce one raw field, logging when a non-sentinel value degrades.
fn coerce_field(namespace: &str, table: &FieldTable, key: &str, raw: &str) -> FieldValue {
    let value = table.coerce(key, raw);
    if value.is_absent() && normalize(raw).is_some() {
        debug!(namespace, field = key, raw, "value failed to coerce, field left absent");
    }
    value
}

/// Collect every line of a non-indexed namespace into one record.
pub fn extract_single(text: &str, pattern: &RecordPattern, table: &FieldTable) -> FlatRecord {
    let mut record = FlatRecord::new();
    for field in pattern.scan(text) {
        let value = coerce_field(pattern.namespace(), table, &field.key, field.value);
        record.insert(field.key, value);
    }
    record
}

/// Collect lines of an indexed namespace into one record per identity.
///
/// Lines for the same identity merge, even when they are not adjacent; the
/// last occurrence of a key wins.
pub fn extract_indexed(text: &str, pattern: &RecordPattern, table: &FieldTable) -> RecordSet {
    let mut records = RecordSet::new();
    for field in pattern.scan(text) {
        let Some(id) = field.id else { continue };
        let value = coerce_field(pattern.namespace(), table, &field.key, field.value);
        records.entry(id).or_default().insert(field.key, value);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldKind;
    use pretty_assertions::assert_eq;

    const TABLE: FieldTable = FieldTable::new(&[("prefix_len", FieldKind::Int)]);

    #[test]
    fn single_namespace_normalizes_keys_and_sentinels() {
        let text = "
system hostname              : sw
system cli-timeout           : 15
system contact               : N/A
system location              :
garbage line
";
        let record = extract_single(text, &RecordPattern::single("system"), &FieldTable::STRINGS);
        assert_eq!(record.str("hostname"), Some("sw"));
        assert_eq!(record.str("cli_timeout"), Some("15"));
        assert_eq!(record.value("contact"), &FieldValue::Absent);
        assert!(record.contains("location"));
        assert_eq!(record.value("location"), &FieldValue::Absent);
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn indexed_lines_merge_per_identity() {
        let text = "
route 1 dest        : 10.0.0.0
route 2 dest        : 0.0.0.0
route 1 prefix-len  : 8
route 1 prefix-len  : 16
";
        let records = extract_indexed(text, &RecordPattern::indexed("route"), &TABLE);
        assert_eq!(records.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(records[&1].int("prefix_len"), Some(16));
        assert_eq!(records[&2].str("dest"), Some("0.0.0.0"));
    }

    #[test]
    fn bad_numeric_value_degrades_only_that_field() {
        let text = "route 4 dest : 10.1.0.0\nroute 4 prefix-len : sixteen\n";
        let records = extract_indexed(text, &RecordPattern::indexed("route"), &TABLE);
        assert_eq!(records[&4].value("prefix_len"), &FieldValue::Absent);
        assert_eq!(records[&4].str("dest"), Some("10.1.0.0"));
    }

    #[test]
    fn non_numeric_identity_is_ignored() {
        let text = "ip abc ip-addr : 10.0.0.1\nip 99999999999 vlan : 1\n";
        let records = extract_indexed(text, &RecordPattern::indexed("ip"), &FieldTable::STRINGS);
        assert!(records.is_empty());
    }

    #[test]
    fn namespace_keyword_is_case_insensitive_and_comments_skipped() {
        let text = "# rf dump\nRF operational : up\n";
        let record = extract_single(text, &RecordPattern::single("rf"), &FieldTable::STRINGS);
        assert_eq!(record.str("operational"), Some("up"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn value_may_contain_colons() {
        let text = "system time : 18:05:00";
        let record = extract_single(text, &RecordPattern::single("system"), &FieldTable::STRINGS);
        assert_eq!(record.str("time"), Some("18:05:00"));
    }
}
