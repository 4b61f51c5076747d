use serde::{Deserialize, Serialize};

use crate::content_id::ContentId;
use crate::error::TypeError;

/// An IPLD link: `{"/": "<cid>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "/")]
    pub target: String,
}

impl Link {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Validate the link target as a content identifier.
    pub fn content_id(&self) -> Result<ContentId, TypeError> {
        ContentId::parse(&self.target)
    }
}

impl From<&ContentId> for Link {
    fn from(cid: &ContentId) -> Self {
        Self::new(cid.as_str())
    }
}

/// A `{from?, to}` pointer pair read from a relationship object.
///
/// The two sides are validated independently: a consumer that only reads
/// `to` is unaffected by a malformed `from`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RelationshipEdge {
    #[serde(default)]
    pub from: Option<Link>,
    pub to: Link,
}

impl RelationshipEdge {
    /// Decode the structure of a relationship object. `to` is mandatory;
    /// link targets are not validated here.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, TypeError> {
        serde_json::from_value(value.clone()).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// The `from` side as a content identifier, when present.
    pub fn from_id(&self) -> Option<Result<ContentId, TypeError>> {
        self.from.as_ref().map(Link::content_id)
    }

    pub fn to_id(&self) -> Result<ContentId, TypeError> {
        self.to.content_id()
    }
}
