// ── Fact subsets ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::decode::{Decoded, Domain};

/// A named group of facts and the read that produces it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FactSubset {
    /// Every typed subset; configuration dumps are opt-in.
    All,
    System,
    Software,
    Ip,
    Route,
    Inventory,
    Rf,
    Rollback,
    RunningConfig,
    StartupConfig,
}

impl FactSubset {
    /// The read command for this subset. `None` for [`FactSubset::All`].
    pub fn command(self) -> Option<&'static str> {
        Some(match self {
            Self::All => return None,
            Self::System => "show system",
            Self::Software => "show sw",
            Self::Ip => "show ip",
            Self::Route => "show route",
            Self::Inventory => "show inventory",
            Self::Rf => "show rf",
            Self::Rollback => "show rollback",
            Self::RunningConfig => "copy running-configuration display",
            Self::StartupConfig => "copy startup-configuration display",
        })
    }

    /// The decoder for this subset's output.
    pub fn domain(self) -> Option<Domain> {
        Some(match self {
            Self::All => return None,
            Self::System => Domain::System,
            Self::Software => Domain::Software,
            Self::Ip => Domain::Ip,
            Self::Route => Domain::Route,
            Self::Inventory => Domain::Inventory,
            Self::Rf => Domain::Rf,
            Self::Rollback => Domain::Rollback,
            Self::RunningConfig | Self::StartupConfig => Domain::Configuration,
        })
    }

    fn is_typed(self) -> bool {
        !matches!(self, Self::All | Self::RunningConfig | Self::StartupConfig)
    }

    /// Resolve `all` and drop duplicates, keeping first-mention order.
    pub fn expand(subsets: &[Self]) -> Vec<Self> {
        let mut out: Vec<Self> = Vec::new();
        for subset in subsets {
            let group: Vec<Self> = if *subset == Self::All {
                Self::iter().filter(|s| s.is_typed()).collect()
            } else {
                vec![*subset]
            };
            for s in group {
                if !out.contains(&s) {
                    out.push(s);
                }
            }
        }
        out
    }
}

/// Gathered facts keyed by subset, in gather order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Facts(IndexMap<FactSubset, Decoded>);

impl Facts {
    pub fn insert(&mut self, subset: FactSubset, decoded: Decoded) {
        self.0.insert(subset, decoded);
    }

    pub fn get(&self, subset: FactSubset) -> Option<&Decoded> {
        self.0.get(&subset)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactSubset, &Decoded)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

/// Short identity summary of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub model: Option<String>,
    pub hostname: Option<String>,
    pub name: Option<String>,
    /// Version in the running flash bank.
    pub version: Option<String>,
}

/// One raw command and the device's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub command: String,
    pub output: String,
}
