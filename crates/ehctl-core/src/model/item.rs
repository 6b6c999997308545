// ── Desired configuration items ──
//
// One item is one intended state for one device-side slot. Items carry
// everything needed to apply *and* verify themselves: the mutating
// command, the slot-scoped read, and the record the read must produce.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::record::FlatRecord;

/// Which slot table an item targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Ip,
    Route,
}

/// An IP address assignment for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpItem {
    pub slot: u32,
    #[serde(alias = "ip_address", alias = "ip")]
    pub address: String,
    #[serde(alias = "prefix_len")]
    pub prefix_length: u8,
    pub vlan: u16,
}

/// A static route for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteItem {
    pub slot: u32,
    #[serde(alias = "dest")]
    pub destination: String,
    #[serde(alias = "prefix_len")]
    pub prefix_length: u8,
    pub next_hop: String,
}

/// A desired configuration item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConfigItem {
    Ip(IpItem),
    Route(RouteItem),
}

const MAX_PREFIX_LENGTH: u8 = 32;
const MAX_VLAN: u16 = 4094;

impl ConfigItem {
    pub fn ip(slot: u32, address: impl Into<String>, prefix_length: u8, vlan: u16) -> Self {
        Self::Ip(IpItem {
            slot,
            address: address.into(),
            prefix_length,
            vlan,
        })
    }

    pub fn route(
        slot: u32,
        destination: impl Into<String>,
        prefix_length: u8,
        next_hop: impl Into<String>,
    ) -> Self {
        Self::Route(RouteItem {
            slot,
            destination: destination.into(),
            prefix_length,
            next_hop: next_hop.into(),
        })
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Ip(_) => ItemKind::Ip,
            Self::Route(_) => ItemKind::Route,
        }
    }

    pub fn slot(&self) -> u32 {
        match self {
            Self::Ip(item) => item.slot,
            Self::Route(item) => item.slot,
        }
    }

    /// Check ranges and address syntax before anything is sent.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Ip(item) => {
                check_ipv4("address", &item.address)?;
                check_prefix(item.prefix_length)?;
                if item.vlan > MAX_VLAN {
                    return Err(format!("Invalid VLAN ID: {} (0-{MAX_VLAN})", item.vlan));
                }
            }
            Self::Route(item) => {
                check_ipv4("destination", &item.destination)?;
                check_ipv4("next_hop", &item.next_hop)?;
                check_prefix(item.prefix_length)?;
            }
        }
        Ok(())
    }

    /// The fields a matching slot read must contain, as decoded values.
    pub fn desired_record(&self) -> FlatRecord {
        match self {
            Self::Ip(item) => FlatRecord::new()
                .with("ip", item.address.as_str())
                .with("prefix_len", item.prefix_length)
                .with("vlan", item.vlan),
            Self::Route(item) => FlatRecord::new()
                .with("dest", item.destination.as_str())
                .with("prefix_len", item.prefix_length)
                .with("next_hop", item.next_hop.as_str()),
        }
    }

    /// Structural equality against an observed record.
    ///
    /// Every desired field must be present and equal; extra observed fields
    /// are ignored.
    pub fn is_satisfied_by(&self, observed: Option<&FlatRecord>) -> bool {
        let Some(observed) = observed else {
            return false;
        };
        self.desired_record()
            .iter()
            .all(|(key, want)| observed.value(key) == want)
    }

    /// The single mutating command for this item.
    pub fn set_command(&self) -> String {
        match self {
            Self::Ip(item) => format!(
                "set ip {} ip-addr {} prefix-len {} vlan {}",
                item.slot, item.address, item.prefix_length, item.vlan
            ),
            Self::Route(item) => format!(
                "set route {} dest {} prefix-len {} next-hop {}",
                item.slot, item.destination, item.prefix_length, item.next_hop
            ),
        }
    }

    /// The slot-scoped read for this item.
    pub fn show_command(&self) -> String {
        format!("show {} {}", self.kind(), self.slot())
    }
}

impl fmt::Display for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(item) => write!(
                f,
                "ip {} ({}/{} vlan {})",
                item.slot, item.address, item.prefix_length, item.vlan
            ),
            Self::Route(item) => write!(
                f,
                "route {} ({}/{} via {})",
                item.slot, item.destination, item.prefix_length, item.next_hop
            ),
        }
    }
}

fn check_ipv4(field: &str, value: &str) -> Result<(), String> {
    value
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| format!("Invalid {field}: '{value}' is not an IPv4 address"))
}

fn check_prefix(prefix_length: u8) -> Result<(), String> {
    if prefix_length > MAX_PREFIX_LENGTH {
        return Err(format!(
            "Invalid prefix length: {prefix_length} (0-{MAX_PREFIX_LENGTH})"
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::FieldValue;

    #[test]
    fn commands_follow_device_syntax() {
        let ip = ConfigItem::ip(3, "192.168.1.100", 24, 0);
        assert_eq!(
            ip.set_command(),
            "set ip 3 ip-addr 192.168.1.100 prefix-len 24 vlan 0"
        );
        assert_eq!(ip.show_command(), "show ip 3");

        let route = ConfigItem::route(1, "10.0.0.0", 8, "192.168.1.1");
        assert_eq!(
            route.set_command(),
            "set route 1 dest 10.0.0.0 prefix-len 8 next-hop 192.168.1.1"
        );
        assert_eq!(route.show_command(), "show route 1");
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        assert!(ConfigItem::ip(1, "10.0.0.1", 33, 0).validate().is_err());
        assert!(ConfigItem::ip(1, "10.0.0.1", 24, 4095).validate().is_err());
        assert!(ConfigItem::ip(1, "not-an-ip", 24, 0).validate().is_err());
        assert!(ConfigItem::route(1, "10.0.0.0", 8, "gateway").validate().is_err());
        assert!(ConfigItem::ip(1, "10.0.0.1", 32, 4094).validate().is_ok());
        assert!(ConfigItem::route(0, "0.0.0.0", 0, "10.0.0.254").validate().is_ok());
    }

    #[test]
    fn absent_observed_field_never_matches() {
        let item = ConfigItem::ip(3, "192.168.1.100", 24, 0);
        let observed = FlatRecord::new()
            .with("ip", "192.168.1.100")
            .with("prefix_len", 24_i64)
            .with("vlan", FieldValue::Absent);
        assert!(!item.is_satisfied_by(Some(&observed)));
        assert!(!item.is_satisfied_by(None));

        let observed = observed.with("vlan", 0_i64).with("default_gateway", "192.168.1.1");
        assert!(item.is_satisfied_by(Some(&observed)));
    }

    #[test]
    fn deserializes_with_alias_field_names() {
        let yaml = r"
- type: ip
  slot: 3
  ip_address: 192.168.1.100
  prefix_len: 24
  vlan: 0
- type: route
  slot: 1
  dest: 10.0.0.0
  prefix_len: 8
  next_hop: 192.168.1.1
";
        let items: Vec<ConfigItem> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            items,
            vec![
                ConfigItem::ip(3, "192.168.1.100", 24, 0),
                ConfigItem::route(1, "10.0.0.0", 8, "192.168.1.1"),
            ]
        );
    }

    #[test]
    fn kind_round_trips_through_strings() {
        assert_eq!(ItemKind::Route.to_string(), "route");
        assert_eq!("ip".parse::<ItemKind>().unwrap(), ItemKind::Ip);
    }
}
