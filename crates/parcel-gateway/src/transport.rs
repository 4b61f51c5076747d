use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parcel_types::ContentId;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::endpoint::{GatewayEndpoint, TOKEN_QUERY_PARAM};
use crate::error::{AttemptError, GatewayResult};

/// A single request to a single gateway.
///
/// Implementations perform exactly one attempt; rotation and retry belong to
/// the resolver.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn fetch(&self, endpoint: &GatewayEndpoint, cid: &ContentId)
        -> Result<Bytes, AttemptError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a client whose requests time out after `request_timeout`.
    pub fn new(request_timeout: Duration) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("parcel-indexer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an existing client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GatewayTransport for HttpTransport {
    async fn fetch(
        &self,
        endpoint: &GatewayEndpoint,
        cid: &ContentId,
    ) -> Result<Bytes, AttemptError> {
        let url = endpoint.resource_url(cid);
        debug!(url = %url, "fetching from gateway");

        let mut req = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &endpoint.token {
            req = req.query(&[(TOKEN_QUERY_PARAM, token)]);
        }

        let resp = req.send().await.map_err(classify)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }
        resp.bytes().await.map_err(classify)
    }
}

fn classify(e: reqwest::Error) -> AttemptError {
    if e.is_timeout() {
        AttemptError::Timeout
    } else {
        AttemptError::Connect(e.to_string())
    }
}
