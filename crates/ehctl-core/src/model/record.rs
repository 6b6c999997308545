// ── Flat records ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::FieldValue;

/// One logical record: every `key : value` line that shared an identity.
///
/// Field order follows the device output. Later lines for the same key
/// overwrite earlier ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord {
    fields: IndexMap<String, FieldValue>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for expected values in tests.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// The value for `key`, treating "never seen" as `Absent`.
    pub fn value(&self, key: &str) -> &FieldValue {
        static ABSENT: FieldValue = FieldValue::Absent;
        self.fields.get(key).unwrap_or(&ABSENT)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.value(key).as_str()
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.value(key).as_int()
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.value(key).as_float()
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.value(key).as_bool()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into `self`; `other` wins on shared keys.
    pub fn merge(&mut self, other: Self) {
        self.fields.extend(other.fields);
    }
}

impl IntoIterator for FlatRecord {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Records keyed by identity (slot or id), in order of first appearance.
pub type RecordSet = IndexMap<u32, FlatRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_reads_as_absent() {
        let record = FlatRecord::new().with("ip", "10.0.0.1");
        assert_eq!(record.value("vlan"), &FieldValue::Absent);
        assert!(!record.contains("vlan"));
        assert_eq!(record.str("ip"), Some("10.0.0.1"));
    }

    #[test]
    fn merge_overwrites_shared_keys() {
        let mut a = FlatRecord::new().with("ip", "10.0.0.1").with("vlan", 0_i64);
        a.merge(FlatRecord::new().with("vlan", 100_i64));
        assert_eq!(a.int("vlan"), Some(100));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn serializes_as_plain_map() {
        let record = FlatRecord::new().with("dest", "0.0.0.0").with("prefix_len", 0_i64);
        let json = serde_json::to_string(&record).unwrap_or_default();
        assert_eq!(json, r#"{"dest":"0.0.0.0","prefix_len":0}"#);
    }
}
