use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::FetchCache;
use crate::endpoint::{default_gateways, ordered_endpoints, GatewayEndpoint};
use crate::error::{GatewayError, GatewayResult};

pub const ENV_GATEWAY_URL: &str = "PARCEL_GATEWAY_URL";
pub const ENV_GATEWAY_TOKEN: &str = "PARCEL_GATEWAY_TOKEN";
pub const ENV_INTER_PASS_DELAY_MS: &str = "PARCEL_INTER_PASS_DELAY_MS";
pub const ENV_METADATA_MAX_PASSES: &str = "PARCEL_METADATA_MAX_PASSES";

/// How many full passes over the endpoint list a request may make.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryBudget {
    /// Root metadata: a small cap; exhaustion fails the event.
    Metadata,
    /// Relationship and leaf documents: effectively unbounded.
    Content,
}

/// Pass limits and the delay between passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub inter_pass_delay: Duration,
    pub metadata_max_passes: u32,
    pub content_max_passes: u32,
}

impl RetryPolicy {
    pub fn max_passes(&self, budget: RetryBudget) -> u32 {
        match budget {
            RetryBudget::Metadata => self.metadata_max_passes,
            RetryBudget::Content => self.content_max_passes,
        }
        .max(1)
    }
}

/// Configuration for gateway resolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Tried before every fallback; usually supplied by the environment.
    pub primary: Option<GatewayEndpoint>,
    /// Ordered fallback gateways.
    pub fallbacks: Vec<GatewayEndpoint>,
    /// Wait after a pass in which every endpoint failed.
    pub inter_pass_delay_ms: u64,
    /// Pass cap for root metadata.
    pub metadata_max_passes: u32,
    /// Pass cap for relationship and leaf documents.
    pub content_max_passes: u32,
    /// Per-request transport timeout.
    pub request_timeout_ms: u64,
    /// Most payloads kept in the fetch cache; 0 is unbounded.
    pub cache_capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            primary: None,
            fallbacks: default_gateways(),
            inter_pass_delay_ms: 10_000,
            metadata_max_passes: 3,
            content_max_passes: 100_000,
            request_timeout_ms: 30_000,
            cache_capacity: 50_000,
        }
    }
}

impl GatewayConfig {
    /// The effective ordered, de-duplicated endpoint list.
    pub fn endpoints(&self) -> Vec<GatewayEndpoint> {
        ordered_endpoints(self.primary.as_ref(), &self.fallbacks)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            inter_pass_delay: Duration::from_millis(self.inter_pass_delay_ms),
            metadata_max_passes: self.metadata_max_passes,
            content_max_passes: self.content_max_passes,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// A fetch cache sized by `cache_capacity`.
    pub fn fetch_cache(&self) -> FetchCache {
        FetchCache::with_capacity(self.cache_capacity)
    }

    /// Overlay settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay settings from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values are ignored and the configured value kept.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_GATEWAY_URL).filter(|u| !u.trim().is_empty()) {
            let mut primary = GatewayEndpoint::new(url.trim());
            if let Some(token) = lookup(ENV_GATEWAY_TOKEN) {
                primary = primary.with_token(token);
            }
            self.primary = Some(primary);
        }
        if let Some(ms) = lookup(ENV_INTER_PASS_DELAY_MS).and_then(|v| v.trim().parse().ok()) {
            self.inter_pass_delay_ms = ms;
        }
        if let Some(n) = lookup(ENV_METADATA_MAX_PASSES).and_then(|v| v.trim().parse().ok()) {
            self.metadata_max_passes = n;
        }
    }

    pub fn validate(&self) -> GatewayResult<()> {
        if self.endpoints().is_empty() {
            return Err(GatewayError::NoEndpoints);
        }
        if self.metadata_max_passes == 0 || self.content_max_passes == 0 {
            return Err(GatewayError::Config("pass caps must be at least 1".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(GatewayError::Config("request timeout must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = GatewayConfig::default();
        assert!(c.primary.is_none());
        assert_eq!(c.inter_pass_delay_ms, 10_000);
        assert_eq!(c.metadata_max_passes, 3);
        assert_eq!(c.content_max_passes, 100_000);
        assert_eq!(c.fetch_cache().capacity(), 50_000);
        assert!(c.validate().is_ok());
        assert_eq!(c.endpoints().len(), c.fallbacks.len());
    }

    #[test]
    fn env_primary_is_prepended() {
        let mut c = GatewayConfig::default();
        c.apply_env_with(lookup(&[
            (ENV_GATEWAY_URL, "https://primary.example/ipfs"),
            (ENV_GATEWAY_TOKEN, "tok"),
        ]));
        let endpoints = c.endpoints();
        assert_eq!(endpoints[0].base_url, "https://primary.example/ipfs");
        assert_eq!(endpoints[0].token.as_deref(), Some("tok"));
        assert_eq!(endpoints.len(), c.fallbacks.len() + 1);
    }

    #[test]
    fn env_overrides_retry_settings() {
        let mut c = GatewayConfig::default();
        c.apply_env_with(lookup(&[
            (ENV_INTER_PASS_DELAY_MS, "250"),
            (ENV_METADATA_MAX_PASSES, "not-a-number"),
        ]));
        assert_eq!(c.retry_policy().inter_pass_delay, Duration::from_millis(250));
        assert_eq!(c.metadata_max_passes, 3);
    }

    #[test]
    fn blank_env_url_is_ignored() {
        let mut c = GatewayConfig::default();
        c.apply_env_with(lookup(&[(ENV_GATEWAY_URL, "  ")]));
        assert!(c.primary.is_none());
    }

    #[test]
    fn validate_rejects_empty_list_and_zero_caps() {
        let c = GatewayConfig {
            fallbacks: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(GatewayError::NoEndpoints)));

        let c = GatewayConfig {
            metadata_max_passes: 0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(GatewayError::Config(_))));
    }

    #[test]
    fn budget_caps() {
        let p = GatewayConfig::default().retry_policy();
        assert_eq!(p.max_passes(RetryBudget::Metadata), 3);
        assert_eq!(p.max_passes(RetryBudget::Content), 100_000);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let c: GatewayConfig = serde_json::from_str(
            r#"{"fallbacks":[{"base_url":"https://a/ipfs","token":"t"}],"metadata_max_passes":5}"#,
        )
        .unwrap();
        assert_eq!(c.fallbacks.len(), 1);
        assert_eq!(c.metadata_max_passes, 5);
        assert_eq!(c.inter_pass_delay_ms, 10_000);
    }
}
