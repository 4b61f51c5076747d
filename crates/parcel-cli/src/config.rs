use std::path::{Path, PathBuf};

use anyhow::Context;
use parcel_gate::GateConfig;
use parcel_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration file.
///
/// ```toml
/// [gateway]
/// inter_pass_delay_ms = 10000
/// cache_capacity = 50000
/// fallbacks = [{ base_url = "https://ipfs.io/ipfs" }]
///
/// [gate]
/// allowed_submitters = ["0xabc..."]
///
/// [store]
/// dir = "./records"
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub gateway: GatewayConfig,
    pub gate: GateConfig,
    pub store: StoreConfig,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory for the JSON record store. In-memory when unset.
    pub dir: Option<PathBuf>,
}

impl IndexerConfig {
    /// Load the file (if any), then overlay the process environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.gateway.apply_env();
        config.gate.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
