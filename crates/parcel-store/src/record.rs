use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::EntityType;
use crate::error::{StoreError, StoreResult};

/// The unit of storage: entity tag, id, and a flat JSON body.
///
/// The store never interprets the body. Typed views are produced by
/// [`Entity::from_record`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub entity: EntityType,
    pub id: String,
    pub body: Value,
}

impl StoredRecord {
    pub fn new(entity: EntityType, id: impl Into<String>, body: Value) -> Self {
        Self {
            entity,
            id: id.into(),
            body,
        }
    }

    /// Read a top-level string field from the body.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }
}

/// A typed record that can be converted to and from a [`StoredRecord`].
pub trait Entity: Serialize + DeserializeOwned {
    const ENTITY: EntityType;

    /// The record's primary key.
    fn id(&self) -> &str;

    fn to_record(&self) -> StoreResult<StoredRecord> {
        if self.id().is_empty() {
            return Err(StoreError::EmptyId(Self::ENTITY));
        }
        Ok(StoredRecord::new(
            Self::ENTITY,
            self.id(),
            serde_json::to_value(self)?,
        ))
    }

    fn from_record(record: &StoredRecord) -> StoreResult<Self> {
        if record.entity != Self::ENTITY {
            return Err(StoreError::EntityMismatch {
                expected: Self::ENTITY,
                actual: record.entity,
            });
        }
        Ok(serde_json::from_value(record.body.clone())?)
    }
}
