// ── Domain model ──
//
// Typed values decoded from device text, the flat records they group
// into, and the desired-state items the reconciliation engine consumes.

pub mod field;
pub mod item;
pub mod record;

pub use field::{FieldKind, FieldTable, FieldValue, coerce, normalize};
pub use item::{ConfigItem, IpItem, ItemKind, RouteItem};
pub use record::{FlatRecord, RecordSet};
