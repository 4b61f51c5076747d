use std::collections::HashSet;
use std::fmt;

use parcel_types::ContentId;
use serde::{Deserialize, Serialize};

/// Query parameter that carries a gateway access token.
pub const TOKEN_QUERY_PARAM: &str = "pinataGatewayToken";

/// Public gateways tried after any configured primary.
pub const DEFAULT_GATEWAYS: &[&str] = &[
    "https://ipfs.io/ipfs",
    "https://gateway.ipfs.io/ipfs",
    "https://dweb.link/ipfs",
    "https://w3s.link/ipfs",
    "https://gateway.pinata.cloud/ipfs",
    "https://cloudflare-ipfs.com/ipfs",
];

/// One HTTP gateway serving `GET <base_url>/<cid>`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayEndpoint {
    pub base_url: String,
    /// Access token appended as [`TOKEN_QUERY_PARAM`], if the gateway needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl GatewayEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.trim().is_empty()).then_some(token);
        self
    }

    /// Base URL without surrounding whitespace or trailing slashes.
    pub fn base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Resource URL for a CID, without the token.
    pub fn resource_url(&self, cid: &ContentId) -> String {
        format!("{}/{}", self.base(), cid)
    }

    /// Key used to detect the same gateway listed twice.
    pub fn dedup_key(&self) -> String {
        self.base().to_ascii_lowercase()
    }
}

// Tokens never reach logs.
impl fmt::Debug for GatewayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayEndpoint")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Display for GatewayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base())?;
        if self.token.is_some() {
            write!(f, " (token)")?;
        }
        Ok(())
    }
}

/// Build the ordered endpoint list: `primary` first, then `fallbacks`.
///
/// Blank entries are skipped. When the same base URL appears more than once
/// the first occurrence wins, so a primary that also appears in the fallback
/// list keeps its token and its position.
pub fn ordered_endpoints(
    primary: Option<&GatewayEndpoint>,
    fallbacks: &[GatewayEndpoint],
) -> Vec<GatewayEndpoint> {
    let mut seen = HashSet::new();
    primary
        .into_iter()
        .chain(fallbacks)
        .filter(|e| !e.base_url.trim().is_empty())
        .filter(|e| seen.insert(e.dedup_key()))
        .cloned()
        .collect()
}

/// The built-in fallback list.
pub fn default_gateways() -> Vec<GatewayEndpoint> {
    DEFAULT_GATEWAYS.iter().map(|u| GatewayEndpoint::new(*u)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid() -> ContentId {
        ContentId::from_digest(&[0xaa; 32]).unwrap()
    }

    #[test]
    fn resource_url_strips_trailing_slash() {
        let e = GatewayEndpoint::new("https://ipfs.io/ipfs/");
        assert_eq!(
            e.resource_url(&cid()),
            format!("https://ipfs.io/ipfs/{}", cid())
        );
    }

    #[test]
    fn primary_goes_first_and_is_deduplicated() {
        let primary = GatewayEndpoint::new("https://DWEB.link/ipfs/").with_token("secret");
        let list = ordered_endpoints(Some(&primary), &default_gateways());
        assert_eq!(list.len(), DEFAULT_GATEWAYS.len());
        assert_eq!(list[0], primary);
        assert_eq!(
            list.iter().filter(|e| e.dedup_key() == "https://dweb.link/ipfs").count(),
            1
        );
    }

    #[test]
    fn duplicate_fallbacks_collapse() {
        let fallbacks = vec![
            GatewayEndpoint::new("https://ipfs.io/ipfs"),
            GatewayEndpoint::new("https://w3s.link/ipfs"),
            GatewayEndpoint::new("https://ipfs.io/ipfs/"),
            GatewayEndpoint::new("  "),
        ];
        let list = ordered_endpoints(None, &fallbacks);
        let urls: Vec<_> = list.iter().map(|e| e.base_url.as_str()).collect();
        assert_eq!(urls, vec!["https://ipfs.io/ipfs", "https://w3s.link/ipfs"]);
    }

    #[test]
    fn blank_token_is_dropped() {
        assert!(GatewayEndpoint::new("https://a").with_token(" ").token.is_none());
    }

    #[test]
    fn debug_and_display_redact_token() {
        let e = GatewayEndpoint::new("https://gw.example/ipfs").with_token("s3cr3t");
        assert!(!format!("{e:?}").contains("s3cr3t"));
        assert_eq!(e.to_string(), "https://gw.example/ipfs (token)");
    }
}
