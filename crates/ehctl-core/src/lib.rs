// ehctl-core: Device-output decoding and verified reconciliation for EH radios.

pub mod decode;
pub mod error;
pub mod facts;
pub mod model;
pub mod parse;
pub mod reconcile;
pub mod rollback;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use facts::{CommandOutput, DeviceInfo, FactSubset, Facts};
pub use reconcile::{Failure, ItemBackend, Mode, Outcome, ReconcileResult};
pub use rollback::{MAX_ROLLBACK_TIMEOUT, RollbackBackend, RollbackReport, RollbackTarget};
pub use session::{SaveReport, Session};

// Decoders and model types at the crate root for ergonomics.
pub use decode::{Decoded, Domain, RollbackStatus, decode};
pub use model::{
    ConfigItem, FieldKind, FieldTable, FieldValue, FlatRecord, IpItem, ItemKind, RecordSet,
    RouteItem,
};
pub use parse::{BankRow, BankTable, TreeNode};
