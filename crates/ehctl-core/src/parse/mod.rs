// ── Text extraction ──
//
// Generic building blocks the per-domain decoders share: keyed line
// records, the fixed-column bank table, and parent-linked trees.

pub mod hierarchy;
pub mod lines;
pub mod table;

pub use hierarchy::{TreeNode, assemble};
pub use lines::{RawField, RecordPattern, extract_indexed, extract_single};
pub use table::{BankRow, BankTable, extract_table};
