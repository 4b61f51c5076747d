use serde::{Deserialize, Serialize};

use crate::content_id::ContentId;
use crate::error::TypeError;

/// Which contract event produced a submission.
///
/// Both kinds carry the same payload and are processed identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[default]
    DataSubmitted,
    DataGroupHeartBeat,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataSubmitted => write!(f, "DataSubmitted"),
            Self::DataGroupHeartBeat => write!(f, "DataGroupHeartBeat"),
        }
    }
}

/// A decoded chain event announcing a new property document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEvent {
    #[serde(default)]
    pub kind: EventKind,
    /// Hex digest of the submitted document (32 bytes, optional `0x`).
    pub content_hash: String,
    /// Address of the submitting wallet.
    pub submitter: String,
    /// Chain-derived property key; the provisional root id.
    pub property_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_group_hash: Option<String>,
    /// Block timestamp (seconds).
    pub timestamp: u64,
}

impl SubmissionEvent {
    /// Derive the CID of the event's root document.
    pub fn content_id(&self) -> Result<ContentId, TypeError> {
        ContentId::from_hash_hex(&self.content_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_with_defaults() {
        let event: SubmissionEvent = serde_json::from_value(json!({
            "contentHash": format!("0x{}", "aa".repeat(32)),
            "submitter": "0xAbC",
            "propertyHash": "0xprop",
            "timestamp": 1700000000u64,
        }))
        .unwrap();
        assert_eq!(event.kind, EventKind::DataSubmitted);
        assert!(event.data_group_hash.is_none());
        assert_eq!(
            event.content_id().unwrap().as_str(),
            "bafkreifkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvkvi"
        );
    }

    #[test]
    fn decodes_heartbeat_kind() {
        let event: SubmissionEvent = serde_json::from_value(json!({
            "kind": "DataGroupHeartBeat",
            "contentHash": "00",
            "submitter": "0x1",
            "propertyHash": "p",
            "dataGroupHash": "0xgroup",
            "timestamp": 1,
        }))
        .unwrap();
        assert_eq!(event.kind, EventKind::DataGroupHeartBeat);
        assert_eq!(event.data_group_hash.as_deref(), Some("0xgroup"));
        assert!(event.content_id().is_err());
    }
}
