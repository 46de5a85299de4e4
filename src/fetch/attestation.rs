//! POH attestation lookup
//!
//! Endpoint: `GET <attestation_url>/<address>`
//! Returns: `{ "poh": bool }`

use {
    super::{AttestationSource, Fetched, Metric},
    crate::error::FetchError,
    async_trait::async_trait,
    serde::Deserialize,
};

#[derive(Debug, Deserialize)]
struct PohResponse {
    poh: bool,
}

#[derive(Debug, Clone)]
pub struct AttestationClient {
    http: reqwest::Client,
    base_url: String,
}

impl AttestationClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Address is appended verbatim, without case folding
    pub fn url_for(&self, address: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), address)
    }

    pub async fn query(&self, address: &str) -> Result<bool, FetchError> {
        let response = self.http.get(self.url_for(address)).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body: PohResponse = response.json().await?;
        Ok(body.poh)
    }
}

#[async_trait]
impl AttestationSource for AttestationClient {
    async fn fetch_attestation(&self, address: &str) -> Fetched<bool> {
        match self.query(address).await {
            Ok(verified) => Fetched::success(verified),
            Err(e) => {
                log::warn!("{} for {}: {}", Metric::Attestation.failure_message(), address, e);
                Fetched::failed(false, e)
            }
        }
    }
}
