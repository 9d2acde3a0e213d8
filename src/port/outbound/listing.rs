//! Upstream server listing port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ProxyEndpoint, ServerEntry};

/// One page of the paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerPage {
    pub entries: Vec<ServerEntry>,
    /// Cursor for the next page; `None` on the last page.
    pub next_cursor: Option<String>,
}

/// Why a single page request failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    /// HTTP 429; retried with another proxy without counting as a failure.
    #[error("rate limited")]
    RateLimited,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed listing response: {0}")]
    Decode(String),
}

/// Fetches a single page of the server listing.
///
/// Implementations perform exactly one request; retry and backoff policy
/// belongs to the caller.
#[async_trait]
pub trait ServerListing: Send + Sync {
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<ServerPage, ListingError>;
}
