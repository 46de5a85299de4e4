//! Runtime configuration from environment variables
//!
//! Every value has a default pointing at the public Linea endpoints, so an
//! empty environment works out of the box.

use {
    crate::batch::{GroupMode, DEFAULT_REQUEST_CONCURRENCY},
    alloy_primitives::Address,
    std::{env, str::FromStr, time::Duration},
};

pub const DEFAULT_POINTS_URL: &str =
    "https://kx58j6x5me.execute-api.us-east-1.amazonaws.com/linea/getUserPointsSearch";
pub const DEFAULT_ATTESTATION_URL: &str = "https://linea-xp-poh-api.linea.build/poh";
pub const DEFAULT_RPC_URL: &str = "https://rpc.linea.build";
/// LXP token contract on Linea mainnet
pub const DEFAULT_TOKEN_ADDRESS: &str = "0xd83af4fbD77f3AB65C3B1Dc4B38D7e67AEcf599A";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Points search endpoint (queried with `?user=<address>`)
    pub points_url: String,
    /// Attestation endpoint; the address is appended as a path segment
    pub attestation_url: String,
    /// JSON-RPC node used for the `balanceOf` call
    pub rpc_url: String,
    pub token_address: Address,
    /// Per-request timeout shared by every HTTP call
    pub request_timeout: Duration,
    /// Lookups in flight at once across a whole batch
    pub request_concurrency: usize,
    pub group_mode: GroupMode,
    pub rust_log: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `LINEA_POINTS_URL`
    /// - `LINEA_POH_URL`
    /// - `LINEA_RPC_URL`
    /// - `LXP_TOKEN_ADDRESS`
    /// - `REQUEST_TIMEOUT_SECS` (default: 10)
    /// - `REQUEST_CONCURRENCY` (default: 16)
    /// - `SEQUENTIAL_GROUPS` (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let points_url = lookup("LINEA_POINTS_URL").unwrap_or_else(|| DEFAULT_POINTS_URL.to_string());
        let attestation_url =
            lookup("LINEA_POH_URL").unwrap_or_else(|| DEFAULT_ATTESTATION_URL.to_string());
        let rpc_url = lookup("LINEA_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        for (name, url) in [
            ("LINEA_POINTS_URL", &points_url),
            ("LINEA_POH_URL", &attestation_url),
            ("LINEA_RPC_URL", &rpc_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        let token_str =
            lookup("LXP_TOKEN_ADDRESS").unwrap_or_else(|| DEFAULT_TOKEN_ADDRESS.to_string());
        let token_address = Address::from_str(token_str.trim()).map_err(|_| {
            ConfigError::InvalidValue(format!("LXP_TOKEN_ADDRESS is not an address: {}", token_str))
        })?;

        let timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let request_concurrency = lookup("REQUEST_CONCURRENCY")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_REQUEST_CONCURRENCY);

        let sequential = lookup("SEQUENTIAL_GROUPS")
            .map(|s| s.to_lowercase())
            .and_then(|s| s.parse::<bool>().ok())
            .unwrap_or(false);
        let group_mode = if sequential {
            GroupMode::Sequential
        } else {
            GroupMode::Concurrent
        };

        Ok(Self {
            points_url,
            attestation_url,
            rpc_url,
            token_address,
            request_timeout: Duration::from_secs(timeout_secs),
            request_concurrency,
            group_mode,
            rust_log: lookup("RUST_LOG"),
        })
    }
}
