use thiserror::Error;

/// Network-level failures.
///
/// HTTP error statuses are not failures: any resolved response, 4xx/5xx
/// included, is returned verbatim. Only these errors trigger the fetch
/// handler's fallback chain.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err)
        }
    }
}
