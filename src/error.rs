//! Error types shared by the fetchers and the batch runner

use {crate::fetch::rpc::RpcError, thiserror::Error};

/// Failure of a single external lookup.
///
/// Never escapes a fetcher: it is logged and folded into a failed
/// [`Outcome`](crate::fetch::Outcome) carrying its text as detail.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("unit conversion failed: {0}")]
    Units(#[from] alloy_primitives::utils::UnitsError),
}

/// Failure of a whole query cycle. Partial results are discarded.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{group} returned {got} results for {expected} addresses")]
    Misaligned {
        group: &'static str,
        expected: usize,
        got: usize,
    },
}
