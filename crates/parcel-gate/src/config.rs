use serde::{Deserialize, Serialize};

/// Every environment variable whose name starts with this prefix contributes
/// one allow-listed submitter (`PARCEL_WALLET_ADDRESS`, `PARCEL_WALLET_ADDRESS_2`, ...).
pub const ENV_WALLET_PREFIX: &str = "PARCEL_WALLET_ADDRESS";

/// Configuration for the event gate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Submitters whose events are accepted.
    pub allowed_submitters: Vec<String>,
    /// Compare submitters byte-for-byte instead of ignoring ASCII case.
    pub case_sensitive: bool,
    /// Accept every well-formed event regardless of submitter.
    pub permissive: bool,
}

impl GateConfig {
    /// A configuration that skips the submitter check.
    pub fn permissive() -> Self {
        Self {
            permissive: true,
            ..Default::default()
        }
    }

    pub fn allowing<I, S>(submitters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_submitters: submitters.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Append allow-listed submitters from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_vars(std::env::vars());
    }

    /// Append allow-listed submitters from `(name, value)` pairs.
    ///
    /// Pairs are visited in name order so the resulting list is stable.
    /// Blank values and entries already present are skipped.
    pub fn apply_env_vars<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut matching: Vec<(String, String)> = vars
            .into_iter()
            .filter(|(name, _)| name.starts_with(ENV_WALLET_PREFIX))
            .collect();
        matching.sort();

        for (_, value) in matching {
            let value = value.trim();
            if value.is_empty() || self.allowed_submitters.iter().any(|s| s == value) {
                continue;
            }
            self.allowed_submitters.push(value.to_string());
        }
    }
}
