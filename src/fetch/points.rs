//! LXP-L points lookup
//!
//! Endpoint: `GET <points_url>?user=<lowercase address>`
//! Returns: JSON array of matching users; only the first entry is used.
//! An empty array means the address has no points yet, which is a valid
//! answer (rank 0, points 0), not a failure.

use {
    super::{Fetched, Metric, PointsSource},
    crate::error::FetchError,
    async_trait::async_trait,
    serde::Deserialize,
};

/// Points and leaderboard rank of one address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Points {
    /// Leaderboard position, 0 when unranked
    pub rank: u64,
    pub points: u64,
}

#[derive(Debug, Deserialize)]
struct PointsEntry {
    #[serde(default)]
    rank_xp: u64,
    #[serde(default)]
    xp: u64,
}

fn points_from_entries(entries: &[PointsEntry]) -> Points {
    entries
        .first()
        .map(|entry| Points {
            rank: entry.rank_xp,
            points: entry.xp,
        })
        .unwrap_or_default()
}

/// HTTP client for the points search API
#[derive(Debug, Clone)]
pub struct PointsClient {
    http: reqwest::Client,
    url: String,
}

impl PointsClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Build the search request; the API only matches lowercase addresses
    pub fn request(&self, address: &str) -> reqwest::Result<reqwest::Request> {
        self.http
            .get(&self.url)
            .query(&[("user", address.to_lowercase())])
            .build()
    }

    pub async fn query(&self, address: &str) -> Result<Points, FetchError> {
        let request = self.request(address)?;
        let response = self.http.execute(request).await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let entries: Vec<PointsEntry> = response.json().await?;
        Ok(points_from_entries(&entries))
    }
}

#[async_trait]
impl PointsSource for PointsClient {
    async fn fetch_points(&self, address: &str) -> Fetched<Points> {
        match self.query(address).await {
            Ok(points) => Fetched::success(points),
            Err(e) => {
                log::warn!("{} for {}: {}", Metric::Points.failure_message(), address, e);
                Fetched::failed(Points::default(), e)
            }
        }
    }
}
