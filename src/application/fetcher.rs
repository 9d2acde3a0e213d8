//! Paginated, proxy-rotating fetch of the upstream server listing.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::{ProxyPool, ServerEntry};
use crate::port::outbound::listing::{ListingError, ServerListing};

/// Retry and pacing policy for one fetch pass.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Maximum successful pages per pass.
    pub max_pages: u32,
    /// Failures allowed per proxy before the pass is abandoned.
    pub retries_per_proxy: u32,
    /// Pause after a failed or rate-limited attempt.
    pub retry_delay: Duration,
    /// Pause between successful pages.
    pub page_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_pages: 10,
            retries_per_proxy: 3,
            retry_delay: Duration::from_secs(1),
            page_delay: Duration::from_millis(500),
        }
    }
}

/// Result of a fetch pass. Always usable, possibly partial or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub entries: Vec<ServerEntry>,
    pub pages: u32,
    pub failures: u32,
    pub rate_limited: u32,
    /// True when the pass stopped because the failure cap was reached.
    pub abandoned: bool,
}

/// Walks the cursor-paginated listing until it runs out of pages, hits the
/// page cap, or exhausts its failure budget.
pub struct PaginatedFetcher {
    listing: Arc<dyn ServerListing>,
    proxies: Arc<ProxyPool>,
    policy: FetchPolicy,
}

impl PaginatedFetcher {
    #[must_use]
    pub fn new(listing: Arc<dyn ServerListing>, proxies: Arc<ProxyPool>, policy: FetchPolicy) -> Self {
        Self {
            listing,
            proxies,
            policy,
        }
    }

    /// Failures tolerated before giving up: `proxies × retries`, with an empty
    /// pool counting as one.
    #[must_use]
    pub fn failure_cap(&self) -> u32 {
        let proxies = u32::try_from(self.proxies.len().max(1)).unwrap_or(u32::MAX);
        proxies.saturating_mul(self.policy.retries_per_proxy).max(1)
    }

    /// Fetch every page. Never fails; transport errors feed the retry policy.
    pub async fn fetch_all(&self) -> FetchReport {
        let mut report = FetchReport::default();
        let mut cursor: Option<String> = None;
        let failure_cap = self.failure_cap();

        loop {
            let proxy = self.proxies.select();
            let via = proxy.map_or_else(|| "direct".to_string(), ToString::to_string);
            debug!(page = report.pages + 1, via = %via, "Fetching listing page");

            match self.listing.fetch_page(cursor.as_deref(), proxy).await {
                Ok(page) => {
                    report.pages += 1;
                    let received = page.entries.len();
                    report.entries.extend(page.entries);
                    cursor = page.next_cursor.filter(|next| !next.is_empty());

                    info!(
                        page = report.pages,
                        received,
                        total = report.entries.len(),
                        "Listing page fetched"
                    );

                    if cursor.is_none() {
                        break;
                    }
                    if report.pages >= self.policy.max_pages {
                        info!(
                            pages = report.pages,
                            max_pages = self.policy.max_pages,
                            "Page limit reached"
                        );
                        break;
                    }
                    sleep(self.policy.page_delay).await;
                }
                Err(ListingError::RateLimited) => {
                    report.rate_limited += 1;
                    warn!(via = %via, "Listing rate limited, rotating proxy");
                    sleep(self.policy.retry_delay).await;
                }
                Err(err) => {
                    warn!(via = %via, error = %err, "Listing request failed");
                    sleep(self.policy.retry_delay).await;
                    report.failures += 1;
                    if report.failures >= failure_cap {
                        warn!(
                            failures = report.failures,
                            collected = report.entries.len(),
                            "Failure budget exhausted, abandoning fetch"
                        );
                        report.abandoned = true;
                        break;
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProxyEndpoint;
    use crate::port::outbound::listing::ServerPage;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Replays a fixed script of responses and records the cursors it saw.
    struct Scripted {
        responses: Mutex<VecDeque<Result<ServerPage, ListingError>>>,
        cursors: Mutex<Vec<Option<String>>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<ServerPage, ListingError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                cursors: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ServerListing for Scripted {
        async fn fetch_page(
            &self,
            cursor: Option<&str>,
            _proxy: Option<&ProxyEndpoint>,
        ) -> Result<ServerPage, ListingError> {
            self.cursors.lock().push(cursor.map(str::to_string));
            self.responses
                .lock()
                .pop_front()
                .unwrap_or(Err(ListingError::Transport("script exhausted".into())))
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> Result<ServerPage, ListingError> {
        Ok(ServerPage {
            entries: ids.iter().map(|id| ServerEntry::new(*id, 1)).collect(),
            next_cursor: next.map(str::to_string),
        })
    }

    fn quick_policy(max_pages: u32) -> FetchPolicy {
        FetchPolicy {
            max_pages,
            retries_per_proxy: 3,
            retry_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
        }
    }

    fn fetcher(listing: Arc<Scripted>, proxies: &str, max_pages: u32) -> PaginatedFetcher {
        PaginatedFetcher::new(
            listing,
            Arc::new(ProxyPool::from_list(proxies)),
            quick_policy(max_pages),
        )
    }

    #[tokio::test]
    async fn follows_cursor_until_exhausted() {
        let listing = Scripted::new(vec![page(&["a", "b"], Some("c2")), page(&["c"], None)]);
        let report = fetcher(Arc::clone(&listing), "", 10).fetch_all().await;

        assert_eq!(report.pages, 2);
        assert_eq!(report.entries.len(), 3);
        assert_eq!(*listing.cursors.lock(), vec![None, Some("c2".to_string())]);
    }

    #[tokio::test]
    async fn stops_at_page_cap() {
        let listing = Scripted::new(vec![
            page(&["a"], Some("2")),
            page(&["b"], Some("3")),
            page(&["c"], Some("4")),
        ]);
        let report = fetcher(listing, "", 2).fetch_all().await;

        assert_eq!(report.pages, 2);
        assert_eq!(report.entries.len(), 2);
        assert!(!report.abandoned);
    }

    #[tokio::test]
    async fn empty_cursor_ends_pagination() {
        let listing = Scripted::new(vec![page(&["a"], Some(""))]);
        let report = fetcher(listing, "", 10).fetch_all().await;
        assert_eq!(report.pages, 1);
    }

    #[tokio::test]
    async fn rate_limits_retry_same_cursor_without_counting() {
        let listing = Scripted::new(vec![
            page(&["a"], Some("next")),
            Err(ListingError::RateLimited),
            Err(ListingError::RateLimited),
            Err(ListingError::RateLimited),
            Err(ListingError::RateLimited),
            page(&["b"], None),
        ]);
        let report = fetcher(Arc::clone(&listing), "", 1_000).fetch_all().await;

        assert_eq!(report.pages, 2);
        assert_eq!(report.failures, 0);
        assert_eq!(report.rate_limited, 4);
        let cursors = listing.cursors.lock();
        assert!(cursors[1..].iter().all(|c| c.as_deref() == Some("next")));
    }

    #[tokio::test]
    async fn abandons_after_failure_cap_keeping_partial_results() {
        // Two proxies × 3 retries = 6 failures allowed.
        let mut script = vec![page(&["a", "b"], Some("next"))];
        script.extend((0..10).map(|_| Err(ListingError::Status(503))));
        let listing = Scripted::new(script);

        let report = fetcher(Arc::clone(&listing), "p1:1,p2:2", 10).fetch_all().await;

        assert!(report.abandoned);
        assert_eq!(report.failures, 6);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(listing.cursors.lock().len(), 7);
    }

    #[tokio::test]
    async fn empty_pool_counts_as_single_proxy() {
        let listing = Scripted::new(vec![]);
        let report = fetcher(Arc::clone(&listing), "", 10).fetch_all().await;

        assert!(report.abandoned);
        assert_eq!(report.failures, 3);
        assert!(report.entries.is_empty());
    }

    #[tokio::test]
    async fn failures_do_not_reset_between_pages() {
        let listing = Scripted::new(vec![
            Err(ListingError::Transport("reset".into())),
            page(&["a"], Some("2")),
            Err(ListingError::Decode("bad json".into())),
            page(&["b"], None),
        ]);
        let report = fetcher(listing, "", 10).fetch_all().await;

        assert_eq!(report.failures, 2);
        assert_eq!(report.pages, 2);
        assert!(!report.abandoned);
    }
}
