// ── Fact decoders ──
//
// Pure functions from one command's raw output to typed facts. Each
// decoder owns its field→kind table; none of them fail on malformed input.

pub mod configuration;
pub mod inventory;
pub mod ip;
pub mod rf;
pub mod rollback;
pub mod route;
pub mod software;
pub mod system;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::{FlatRecord, RecordSet};
use crate::parse::{BankTable, TreeNode};

pub use configuration::decode_configuration;
pub use inventory::decode_inventory;
pub use ip::decode_ip;
pub use rf::decode_rf;
pub use rollback::{RollbackStatus, decode_rollback};
pub use route::decode_route;
pub use software::decode_software;
pub use system::decode_system;

/// Which decoder to apply to a piece of device output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    System,
    Software,
    Ip,
    Route,
    Inventory,
    Rf,
    Rollback,
    Configuration,
}

/// The output of any decoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Decoded {
    /// `system`, `rf`
    Record(FlatRecord),
    /// `ip`, `route`
    Records(RecordSet),
    Banks(BankTable),
    Inventory(Option<TreeNode>),
    Rollback(RollbackStatus),
    Text(String),
}

/// Run the decoder for `domain`.
pub fn decode(domain: Domain, text: &str) -> Decoded {
    match domain {
        Domain::System => Decoded::Record(decode_system(text)),
        Domain::Software => Decoded::Banks(decode_software(text)),
        Domain::Ip => Decoded::Records(decode_ip(text)),
        Domain::Route => Decoded::Records(decode_route(text)),
        Domain::Inventory => Decoded::Inventory(decode_inventory(text)),
        Domain::Rf => Decoded::Record(decode_rf(text)),
        Domain::Rollback => Decoded::Rollback(decode_rollback(text)),
        Domain::Configuration => Decoded::Text(decode_configuration(text)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn domain_names_are_kebab_case() {
        assert_eq!(Domain::Rf.to_string(), "rf");
        assert_eq!("configuration".parse::<Domain>().unwrap(), Domain::Configuration);
        assert_eq!(Domain::iter().count(), 8);
    }

    #[test]
    fn dispatch_picks_the_matching_decoder() {
        let decoded = decode(Domain::Rollback, "rollback timeout : 60\n");
        assert_eq!(decoded, Decoded::Rollback(RollbackStatus::active(60)));

        let Decoded::Records(routes) = decode(Domain::Route, "route 1 dest : 0.0.0.0\n") else {
            panic!("route output should decode to records");
        };
        assert_eq!(routes[&1].str("dest"), Some("0.0.0.0"));
    }

    #[test]
    fn decoded_values_serialize_without_tags() {
        let json = serde_json::to_string(&decode(Domain::Configuration, "set a\n\n")).unwrap();
        assert_eq!(json, r#""set a""#);
        let json = serde_json::to_string(&decode(Domain::Inventory, "")).unwrap();
        assert_eq!(json, "null");
    }
}
