use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::record::Entity;

/// Where a root record's id came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSource {
    /// Jurisdiction-issued id read from the Property leaf.
    ParcelIdentifier,
    /// Chain-derived property hash (provisional, or permanent when no parcel
    /// id is ever discovered).
    #[default]
    PropertyHash,
}

impl std::fmt::Display for IdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParcelIdentifier => write!(f, "parcel_identifier"),
            Self::PropertyHash => write!(f, "property_hash"),
        }
    }
}

/// The canonical per-property aggregate.
///
/// Holds the provenance of the latest accepted submission and a foreign key
/// to each singleton leaf resolved for it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootRecord {
    pub id: String,
    pub property_hash: String,
    pub submitter: String,
    /// Hex digest from the chain event.
    pub data_hash: String,
    /// CID derived from `data_hash`.
    pub cid: String,
    pub label: String,
    pub id_source: IdSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_group_hash: Option<String>,
    pub timestamp: u64,
    #[serde(default)]
    pub structure_id: Option<String>,
    #[serde(default)]
    pub address_id: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub ipfs_id: Option<String>,
    #[serde(default)]
    pub lot_id: Option<String>,
    #[serde(default)]
    pub utility_id: Option<String>,
    #[serde(default)]
    pub flood_storm_information_id: Option<String>,
}

impl RootRecord {
    /// Set the foreign key for a singleton leaf. Returns `false` for entity
    /// types that have no field on the root.
    pub fn link(&mut self, entity: EntityType, leaf_id: impl Into<String>) -> bool {
        match self.slot_mut(entity) {
            Some(slot) => {
                *slot = Some(leaf_id.into());
                true
            }
            None => false,
        }
    }

    /// The foreign key currently held for a singleton leaf.
    pub fn linked(&self, entity: EntityType) -> Option<&str> {
        let slot = match entity {
            EntityType::Structure => &self.structure_id,
            EntityType::Address => &self.address_id,
            EntityType::Property => &self.property_id,
            EntityType::IpfsFactSheet => &self.ipfs_id,
            EntityType::Lot => &self.lot_id,
            EntityType::Utility => &self.utility_id,
            EntityType::FloodStormInformation => &self.flood_storm_information_id,
            _ => return None,
        };
        slot.as_deref()
    }

    /// Fill every foreign key this record leaves unset from `prior`.
    ///
    /// Provenance fields always come from `self`: the latest submission wins.
    /// A branch that failed to resolve in this event keeps the key a previous
    /// event recorded.
    pub fn absorb(&mut self, prior: &RootRecord) {
        for entity in EntityType::ALL.into_iter().filter(EntityType::is_singleton) {
            if self.linked(entity).is_none() {
                if let Some(id) = prior.linked(entity) {
                    self.link(entity, id);
                }
            }
        }
        if self.data_group_hash.is_none() {
            self.data_group_hash = prior.data_group_hash.clone();
        }
    }

    fn slot_mut(&mut self, entity: EntityType) -> Option<&mut Option<String>> {
        match entity {
            EntityType::Structure => Some(&mut self.structure_id),
            EntityType::Address => Some(&mut self.address_id),
            EntityType::Property => Some(&mut self.property_id),
            EntityType::IpfsFactSheet => Some(&mut self.ipfs_id),
            EntityType::Lot => Some(&mut self.lot_id),
            EntityType::Utility => Some(&mut self.utility_id),
            EntityType::FloodStormInformation => Some(&mut self.flood_storm_information_id),
            _ => None,
        }
    }
}

impl Entity for RootRecord {
    const ENTITY: EntityType = EntityType::RootRecord;

    fn id(&self) -> &str {
        &self.id
    }
}
