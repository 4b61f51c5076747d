//! The static edge-type registry.
//!
//! Each edge name found in a root document's `relationships` map corresponds
//! to one [`EdgeType`]. Its [`EdgeSpec`] says how many relationship objects
//! the edge carries and which side(s) of each relationship point at a leaf
//! worth materializing.

use std::fmt;

use parcel_store::EntityType;

/// How many relationship links an edge carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Single,
    Array,
}

/// What to extract from the relationship objects of one edge type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeSpec {
    pub arity: Arity,
    /// Leaf kind the `from` side resolves to, if extracted.
    pub from: Option<EntityType>,
    /// Leaf kind the `to` side resolves to, if extracted.
    pub to: Option<EntityType>,
}

impl EdgeSpec {
    const fn new(arity: Arity, from: Option<EntityType>, to: Option<EntityType>) -> Self {
        Self { arity, from, to }
    }

    /// An edge that yields no leaves is not worth fetching.
    pub fn is_ignored(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
    PropertyHasStructure,
    PropertyHasAddress,
    PropertyHasLot,
    PropertyHasUtility,
    PropertyHasFloodStormInformation,
    AddressHasFactSheet,
    PropertyHasSalesHistory,
    PropertyHasTax,
    PersonHasProperty,
    CompanyHasProperty,
    PropertyHasLayout,
    PropertyHasFile,
    DeedHasFile,
    SalesHistoryHasDeed,
    PropertySeed,
}

impl EdgeType {
    pub const ALL: [EdgeType; 15] = [
        Self::PropertyHasStructure,
        Self::PropertyHasAddress,
        Self::PropertyHasLot,
        Self::PropertyHasUtility,
        Self::PropertyHasFloodStormInformation,
        Self::AddressHasFactSheet,
        Self::PropertyHasSalesHistory,
        Self::PropertyHasTax,
        Self::PersonHasProperty,
        Self::CompanyHasProperty,
        Self::PropertyHasLayout,
        Self::PropertyHasFile,
        Self::DeedHasFile,
        Self::SalesHistoryHasDeed,
        Self::PropertySeed,
    ];

    /// The key used in the `relationships` map.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PropertyHasStructure => "property_has_structure",
            Self::PropertyHasAddress => "property_has_address",
            Self::PropertyHasLot => "property_has_lot",
            Self::PropertyHasUtility => "property_has_utility",
            Self::PropertyHasFloodStormInformation => "property_has_flood_storm_information",
            Self::AddressHasFactSheet => "address_has_fact_sheet",
            Self::PropertyHasSalesHistory => "property_has_sales_history",
            Self::PropertyHasTax => "property_has_tax",
            Self::PersonHasProperty => "person_has_property",
            Self::CompanyHasProperty => "company_has_property",
            Self::PropertyHasLayout => "property_has_layout",
            Self::PropertyHasFile => "property_has_file",
            Self::DeedHasFile => "deed_has_file",
            Self::SalesHistoryHasDeed => "sales_history_has_deed",
            Self::PropertySeed => "property_seed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|edge| edge.name() == name)
    }

    pub fn spec(&self) -> EdgeSpec {
        use Arity::{Array, Single};
        use EntityType as E;
        match self {
            Self::PropertyHasStructure => EdgeSpec::new(Single, None, Some(E::Structure)),
            Self::PropertyHasAddress => {
                EdgeSpec::new(Single, Some(E::Property), Some(E::Address))
            }
            Self::PropertyHasLot => EdgeSpec::new(Single, None, Some(E::Lot)),
            Self::PropertyHasUtility => EdgeSpec::new(Single, None, Some(E::Utility)),
            Self::PropertyHasFloodStormInformation => {
                EdgeSpec::new(Single, None, Some(E::FloodStormInformation))
            }
            Self::AddressHasFactSheet => {
                EdgeSpec::new(Array, Some(E::Address), Some(E::IpfsFactSheet))
            }
            Self::PropertyHasSalesHistory => EdgeSpec::new(Array, None, Some(E::SalesHistory)),
            Self::PropertyHasTax => EdgeSpec::new(Array, None, Some(E::Tax)),
            Self::PersonHasProperty => EdgeSpec::new(Array, Some(E::Person), None),
            Self::CompanyHasProperty => EdgeSpec::new(Array, Some(E::Company), None),
            Self::PropertyHasLayout => EdgeSpec::new(Array, None, Some(E::Layout)),
            Self::PropertyHasFile => EdgeSpec::new(Array, None, Some(E::File)),
            Self::DeedHasFile => EdgeSpec::new(Array, Some(E::Deed), None),
            Self::SalesHistoryHasDeed => EdgeSpec::new(Array, None, Some(E::Deed)),
            Self::PropertySeed => EdgeSpec::new(Single, None, None),
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
