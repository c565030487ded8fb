//! Live network fetching.

use anyhow::Result;
use reqwest::Client;
use tracing::debug;

use crate::cache::ResponseSnapshot;

use super::error::FetchError;
use super::request::Request;

/// HTTP request timeout in seconds.
/// 30s allows for slow origin responses while failing fast enough for the
/// fallback chain to feel responsive.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Network seam for the install seed and the fetch handler.
///
/// Implementations resolve with a snapshot for any HTTP status; an `Err`
/// means a network-level failure (DNS, connect, timeout, abort).
pub trait NetworkFetch: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<ResponseSnapshot>;
}

/// Fetcher backed by a real HTTP client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }
}

impl NetworkFetch for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<ResponseSnapshot> {
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        // Body failures mid-transfer count as network failures too
        let body = response
            .bytes()
            .await
            .map_err(FetchError::from_reqwest)?
            .to_vec();

        debug!(url = %url, status, bytes = body.len(), "Fetched");
        Ok(ResponseSnapshot::new(url, status, headers, body))
    }
}
