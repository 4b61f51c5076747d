use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use parcel_types::ContentId;
use serde_json::Value;

use crate::config::RetryBudget;
use crate::error::{AttemptError, AttemptFailure, GatewayError, GatewayResult};
use crate::resolver::{ContentSource, ShapeCheck};

const MEMORY_ENDPOINT: &str = "memory";

/// A [`ContentSource`] backed by a map of pinned documents.
///
/// Missing CIDs and payloads rejected by the shape check fail immediately
/// with a single-pass [`GatewayError::Exhausted`], so callers see the same
/// error they would after a real gateway outage.
#[derive(Debug, Default)]
pub struct InMemoryContentSource {
    documents: RwLock<HashMap<ContentId, Arc<Value>>>,
    requests: RwLock<HashMap<ContentId, usize>>,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a document under `cid`, replacing any previous one.
    pub fn insert(&self, cid: ContentId, document: Value) {
        if let Ok(mut docs) = self.documents.write() {
            docs.insert(cid, Arc::new(document));
        }
    }

    /// Unpin a document so later resolutions of `cid` fail.
    pub fn remove(&self, cid: &ContentId) -> Option<Arc<Value>> {
        self.documents.write().ok()?.remove(cid)
    }

    /// How many times `cid` has been requested.
    pub fn requests(&self, cid: &ContentId) -> usize {
        self.requests
            .read()
            .ok()
            .and_then(|r| r.get(cid).copied())
            .unwrap_or(0)
    }

    /// Total requests across every CID.
    pub fn total_requests(&self) -> usize {
        self.requests
            .read()
            .map(|r| r.values().sum())
            .unwrap_or(0)
    }

    fn exhausted(cid: &ContentId, error: AttemptError) -> GatewayError {
        GatewayError::Exhausted {
            cid: cid.clone(),
            passes: 1,
            last_pass: vec![AttemptFailure {
                endpoint: MEMORY_ENDPOINT.to_string(),
                error,
            }],
        }
    }
}

#[async_trait]
impl ContentSource for InMemoryContentSource {
    async fn resolve(
        &self,
        cid: &ContentId,
        check: ShapeCheck,
        _budget: RetryBudget,
    ) -> GatewayResult<Arc<Value>> {
        if let Ok(mut requests) = self.requests.write() {
            *requests.entry(cid.clone()).or_insert(0) += 1;
        }
        let document = self
            .documents
            .read()
            .ok()
            .and_then(|docs| docs.get(cid).cloned())
            .ok_or_else(|| Self::exhausted(cid, AttemptError::Status(404)))?;
        check(&document).map_err(|reason| Self::exhausted(cid, AttemptError::Shape(reason)))?;
        Ok(document)
    }
}
