//! Server listing client with one pre-built HTTP client per proxy.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Proxy, StatusCode};
use tracing::{debug, warn};
use url::Url;

use super::dto::ServerListResponse;
use crate::domain::{ProxyEndpoint, ProxyPool};
use crate::error::Result;
use crate::port::outbound::listing::{ListingError, ServerListing, ServerPage};

/// Servers requested per page; the upstream maximum.
const PAGE_LIMIT: &str = "100";

/// Build the listing endpoint for a game.
pub fn listing_url(base_url: &str, game_id: &str) -> Result<Url> {
    let base = Url::parse(base_url)?;
    let path = format!("v1/games/{game_id}/servers/Public");
    Ok(base.join(&path)?)
}

/// Fetches listing pages directly or through a proxy.
///
/// Proxy clients are built once up front; a proxy URL that reqwest rejects is
/// logged and every request routed through it fails as a transport error.
pub struct HttpServerListing {
    endpoint: Url,
    direct: HttpClient,
    proxied: HashMap<String, HttpClient>,
}

impl HttpServerListing {
    pub fn new(endpoint: Url, proxies: &ProxyPool, timeout: Duration) -> Result<Self> {
        let direct = HttpClient::builder().timeout(timeout).no_proxy().build()?;

        let mut proxied = HashMap::with_capacity(proxies.len());
        for endpoint in proxies.iter() {
            let client = Proxy::all(endpoint.as_str())
                .and_then(|proxy| HttpClient::builder().timeout(timeout).proxy(proxy).build());
            match client {
                Ok(client) => {
                    proxied.insert(endpoint.as_str().to_string(), client);
                }
                Err(e) => warn!(proxy = %endpoint, error = %e, "Unusable proxy"),
            }
        }

        debug!(
            endpoint = %endpoint,
            proxies = proxied.len(),
            "Listing client ready"
        );

        Ok(Self {
            endpoint,
            direct,
            proxied,
        })
    }

    fn client_for(&self, proxy: Option<&ProxyEndpoint>) -> std::result::Result<&HttpClient, ListingError> {
        match proxy {
            None => Ok(&self.direct),
            Some(endpoint) => self
                .proxied
                .get(endpoint.as_str())
                .ok_or_else(|| ListingError::Transport(format!("no client for proxy {endpoint}"))),
        }
    }
}

#[async_trait]
impl ServerListing for HttpServerListing {
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
        proxy: Option<&ProxyEndpoint>,
    ) -> std::result::Result<ServerPage, ListingError> {
        let client = self.client_for(proxy)?;

        let mut request = client
            .get(self.endpoint.clone())
            .query(&[("sortOrder", "Asc"), ("limit", PAGE_LIMIT)]);
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ListingError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ListingError::RateLimited);
        }
        if !status.is_success() {
            return Err(ListingError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ListingError::Transport(e.without_url().to_string()))?;
        let parsed: ServerListResponse =
            serde_json::from_slice(&body).map_err(|e| ListingError::Decode(e.to_string()))?;

        Ok(parsed.into())
    }
}
