//! Network access for the install seed and the fetch handler.

pub mod error;
pub mod fetcher;
pub mod request;

pub use error::FetchError;
pub use fetcher::{HttpFetcher, NetworkFetch};
pub use request::Request;
