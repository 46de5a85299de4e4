//! Per-address metric lookups
//!
//! Each lookup is isolated: whatever goes wrong on the wire is caught at the
//! fetcher boundary and turned into a zero value tagged [`Outcome::Failed`].
//! Callers never see an error from a fetcher, only degraded results.
//!
//! ## Module Organization
//!
//! - `points` - LXP-L points and rank (HTTP, JSON array)
//! - `attestation` - POH flag (HTTP, JSON object)
//! - `balance` - LXP token balance (`balanceOf` via `rpc`)
//! - `rpc` - minimal JSON-RPC client for `eth_call`

pub mod attestation;
pub mod balance;
pub mod points;
pub mod rpc;

use {
    async_trait::async_trait,
    std::{fmt, time::Duration},
};

pub use attestation::AttestationClient;
pub use balance::{Balance, BalanceClient};
pub use points::{Points, PointsClient};

/// The three metrics looked up for every address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Points,
    Attestation,
    Balance,
}

impl Metric {
    /// Fixed user-facing message shown when this metric could not be fetched
    pub fn failure_message(self) -> &'static str {
        match self {
            Metric::Points => "Failed to get LXP-L data",
            Metric::Attestation => "Failed to get POH data",
            Metric::Balance => "Failed to get LXP data",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Points => "points",
            Metric::Attestation => "attestation",
            Metric::Balance => "balance",
        };
        f.write_str(name)
    }
}

/// Result of one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed { detail: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// A metric value together with how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub outcome: Outcome,
}

impl<T> Fetched<T> {
    pub fn success(value: T) -> Self {
        Self {
            value,
            outcome: Outcome::Success,
        }
    }

    pub fn failed(value: T, detail: impl ToString) -> Self {
        Self {
            value,
            outcome: Outcome::Failed {
                detail: detail.to_string(),
            },
        }
    }
}

/// Source of LXP-L points
#[async_trait]
pub trait PointsSource: Send + Sync {
    async fn fetch_points(&self, address: &str) -> Fetched<Points>;
}

/// Source of the POH attestation flag
#[async_trait]
pub trait AttestationSource: Send + Sync {
    async fn fetch_attestation(&self, address: &str) -> Fetched<bool>;
}

/// Source of the LXP token balance
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balance(&self, address: &str) -> Fetched<Balance>;
}

/// Shared HTTP client for every lookup
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}
