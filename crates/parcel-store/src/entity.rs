use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every record type the indexer writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    /// Per-property aggregate keyed by parcel identifier or property hash.
    RootRecord,
    Structure,
    Address,
    Property,
    Lot,
    Utility,
    FloodStormInformation,
    IpfsFactSheet,
    SalesHistory,
    Tax,
    Person,
    Company,
    Layout,
    File,
    Deed,
}

impl EntityType {
    pub const ALL: [EntityType; 15] = [
        Self::RootRecord,
        Self::Structure,
        Self::Address,
        Self::Property,
        Self::Lot,
        Self::Utility,
        Self::FloodStormInformation,
        Self::IpfsFactSheet,
        Self::SalesHistory,
        Self::Tax,
        Self::Person,
        Self::Company,
        Self::Layout,
        Self::File,
        Self::Deed,
    ];

    /// Stable name used in logs, directory layouts, and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RootRecord => "RootRecord",
            Self::Structure => "Structure",
            Self::Address => "Address",
            Self::Property => "Property",
            Self::Lot => "Lot",
            Self::Utility => "Utility",
            Self::FloodStormInformation => "FloodStormInformation",
            Self::IpfsFactSheet => "IpfsFactSheet",
            Self::SalesHistory => "SalesHistory",
            Self::Tax => "Tax",
            Self::Person => "Person",
            Self::Company => "Company",
            Self::Layout => "Layout",
            Self::File => "File",
            Self::Deed => "Deed",
        }
    }

    /// Leaf collections that may hold many records per root and carry a
    /// `property_id` foreign key back to it.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            Self::SalesHistory
                | Self::Tax
                | Self::Person
                | Self::Company
                | Self::Layout
                | Self::File
                | Self::Deed
        )
    }

    /// Leaves that appear at most once per root and are referenced from a
    /// root foreign-key field.
    pub fn is_singleton(&self) -> bool {
        !self.is_repeatable() && *self != Self::RootRecord
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entity type: {s}"))
    }
}
