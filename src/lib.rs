//! # Linea Lookup
//!
//! Looks up three independent metrics for a list of Linea addresses and
//! presents them side by side:
//!
//! - **LXP-L** points and rank from the off-chain points API ([`fetch::points`])
//! - **POH** proof-of-humanity flag from the attestation API ([`fetch::attestation`])
//! - **LXP** token balance via a `balanceOf` view call ([`fetch::balance`])
//!
//! ## Flow
//!
//! 1. Raw text is normalized into a deduplicated address list ([`address`])
//! 2. The batch runner fans each fetcher out across the list and merges the
//!    results by index into [`batch::Row`]s ([`batch`])
//! 3. Rows are filtered and summarized ([`stats`])
//! 4. The terminal UI ([`ui`]) or the plain report ([`report`]) renders them
//!
//! Nothing is stored: every query replaces the previous result set.


pub mod address;
pub mod batch;
pub mod config;
pub mod error;
pub mod fetch;
pub mod report;
pub mod state;
pub mod stats;
pub mod ui;

// Re-export commonly used types
pub use address::normalize_addresses;
pub use batch::{BatchRunner, GroupMode, Row, RowStatus};
pub use config::Config;
pub use error::{BatchError, FetchError};
pub use stats::{PohFilter, Stats};
