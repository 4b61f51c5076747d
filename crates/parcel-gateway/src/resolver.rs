use std::sync::Arc;

use async_trait::async_trait;
use parcel_types::ContentId;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::FetchCache;
use crate::config::{GatewayConfig, RetryBudget, RetryPolicy};
use crate::endpoint::GatewayEndpoint;
use crate::error::{AttemptError, AttemptFailure, FailureTier, GatewayError, GatewayResult};
use crate::sleep::{Sleeper, TokioSleeper};
use crate::transport::{GatewayTransport, HttpTransport};

/// Caller-supplied payload validator. A rejected payload is a Tier-2 failure
/// and the next endpoint is tried.
pub type ShapeCheck = fn(&Value) -> Result<(), String>;

/// Anything that can produce the JSON document stored under a CID.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn resolve(
        &self,
        cid: &ContentId,
        check: ShapeCheck,
        budget: RetryBudget,
    ) -> GatewayResult<Arc<Value>>;
}

/// Resolves CIDs by rotating over an ordered gateway list.
///
/// One pass tries every endpoint back-to-back. When a whole pass fails the
/// resolver sleeps for the inter-pass delay and starts over, up to the pass
/// cap of the requested [`RetryBudget`]. Successful payloads are cached by
/// CID in the injected [`FetchCache`]; two concurrent requests for the same
/// CID may both hit the network and converge on the same value.
pub struct GatewayResolver<T = HttpTransport, S = TokioSleeper> {
    endpoints: Vec<GatewayEndpoint>,
    policy: RetryPolicy,
    transport: T,
    sleeper: S,
    cache: Arc<FetchCache>,
}

impl GatewayResolver<HttpTransport, TokioSleeper> {
    /// Production resolver: HTTP transport and the tokio timer.
    pub fn from_config(config: &GatewayConfig, cache: Arc<FetchCache>) -> GatewayResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.request_timeout())?;
        Ok(Self::new(
            config.endpoints(),
            config.retry_policy(),
            transport,
            TokioSleeper,
            cache,
        ))
    }
}

impl<T: GatewayTransport, S: Sleeper> GatewayResolver<T, S> {
    pub fn new(
        endpoints: Vec<GatewayEndpoint>,
        policy: RetryPolicy,
        transport: T,
        sleeper: S,
        cache: Arc<FetchCache>,
    ) -> Self {
        Self {
            endpoints,
            policy,
            transport,
            sleeper,
            cache,
        }
    }

    pub fn endpoints(&self) -> &[GatewayEndpoint] {
        &self.endpoints
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn cache(&self) -> &Arc<FetchCache> {
        &self.cache
    }

    async fn run_pass(
        &self,
        cid: &ContentId,
        check: ShapeCheck,
        pass: u32,
    ) -> Result<Arc<Value>, Vec<AttemptFailure>> {
        let mut failures = Vec::with_capacity(self.endpoints.len());
        for endpoint in &self.endpoints {
            match self.attempt(endpoint, cid, check).await {
                Ok(payload) => {
                    debug!(cid = %cid, endpoint = %endpoint.base(), pass, "resolved");
                    return Ok(payload);
                }
                Err(error) => {
                    debug!(
                        cid = %cid,
                        endpoint = %endpoint.base(),
                        pass,
                        tier = %error.tier(),
                        error = %error,
                        "gateway attempt failed, trying next"
                    );
                    failures.push(AttemptFailure {
                        endpoint: endpoint.base().to_string(),
                        error,
                    });
                }
            }
        }
        Err(failures)
    }

    async fn attempt(
        &self,
        endpoint: &GatewayEndpoint,
        cid: &ContentId,
        check: ShapeCheck,
    ) -> Result<Arc<Value>, AttemptError> {
        let body = self.transport.fetch(endpoint, cid).await?;
        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| AttemptError::NotJson(e.to_string()))?;
        check(&payload).map_err(AttemptError::Shape)?;
        Ok(Arc::new(payload))
    }
}

#[async_trait]
impl<T: GatewayTransport, S: Sleeper> ContentSource for GatewayResolver<T, S> {
    async fn resolve(
        &self,
        cid: &ContentId,
        check: ShapeCheck,
        budget: RetryBudget,
    ) -> GatewayResult<Arc<Value>> {
        if let Some(hit) = self.cache.get(cid) {
            if check(&hit).is_ok() {
                debug!(cid = %cid, "fetch cache hit");
                return Ok(hit);
            }
        }
        if self.endpoints.is_empty() {
            return Err(GatewayError::NoEndpoints);
        }

        let max_passes = self.policy.max_passes(budget);
        let mut pass = 1;
        loop {
            let failures = match self.run_pass(cid, check, pass).await {
                Ok(payload) => {
                    self.cache.insert(cid.clone(), Arc::clone(&payload));
                    return Ok(payload);
                }
                Err(failures) => failures,
            };

            if pass >= max_passes {
                warn!(cid = %cid, passes = pass, budget = ?budget, "gateway resolution exhausted");
                return Err(GatewayError::Exhausted {
                    cid: cid.clone(),
                    passes: pass,
                    last_pass: failures,
                });
            }

            let tier1 = failures
                .iter()
                .filter(|f| f.error.tier() == FailureTier::Tier1)
                .count();
            warn!(
                cid = %cid,
                pass,
                max_passes,
                tier1,
                tier2 = failures.len() - tier1,
                delay_ms = self.policy.inter_pass_delay.as_millis() as u64,
                "no gateway succeeded in pass, retrying after delay"
            );
            self.sleeper.sleep(self.policy.inter_pass_delay).await;
            pass += 1;
        }
    }
}
