use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, warn};

use super::parser::{parse_page, Page};
use crate::config::{FeedConfig, RetryConfig};
use crate::error::FeedError;

/// HTTP client for the paginated customer-review feed.
pub struct FeedClient {
    client: Client,
    feed: FeedConfig,
    retry: RetryConfig,
}

/// Classification of one page fetch.
enum PageOutcome {
    /// 200 with at least one entry.
    Reviews(Page),
    /// 200 with no entries; the natural end of the walk.
    EndOfFeed,
    /// Terminal non-200 status or unparseable body. The walk stops and
    /// keeps whatever was collected before this page.
    Truncated,
}

impl FeedClient {
    pub fn new(feed: FeedConfig, retry: RetryConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(feed.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            feed,
            retry,
        })
    }

    fn page_url(&self, app_id: &str, page: u32) -> String {
        format!(
            "{}/{}/rss/customerreviews/page={}/id={}/sortby={}/xml",
            self.feed.base_url, self.feed.region, page, app_id, self.feed.sort_order
        )
    }

    /// Walk the feed from `start_page`, one request at a time, until a page
    /// comes back empty or a terminal status truncates the run.
    ///
    /// Pages are returned in ascending page order; the empty terminator page
    /// is never included. The only error cases are transport failures and an
    /// exhausted retry budget on a 503-ing page.
    pub async fn fetch_all(&self, app_id: &str, start_page: u32) -> Result<Vec<Page>, FeedError> {
        let mut pages = Vec::new();
        let mut page = start_page;

        loop {
            match self.fetch_page(app_id, page).await? {
                PageOutcome::Reviews(parsed) => {
                    pages.push(parsed);
                    page += 1;
                }
                PageOutcome::EndOfFeed => {
                    info!(page, "Reached end of feed");
                    break;
                }
                PageOutcome::Truncated => break,
            }
        }

        Ok(pages)
    }

    /// Fetch and classify a single page, retrying on 503 with exponential
    /// backoff up to the configured attempt cap.
    async fn fetch_page(&self, app_id: &str, page: u32) -> Result<PageOutcome, FeedError> {
        let url = self.page_url(app_id, page);

        for attempt in 1..=self.retry.max_attempts {
            debug!(page, attempt, "Requesting feed page");

            let response = self.client.get(&url).send().await?;
            let status = response.status();

            if status == StatusCode::SERVICE_UNAVAILABLE {
                if attempt < self.retry.max_attempts {
                    let backoff = 1u64 << (attempt - 1).min(16);
                    let delay =
                        Duration::from_millis(self.retry.base_delay_ms.saturating_mul(backoff));
                    warn!(page, attempt, delay_ms = delay.as_millis() as u64, "Feed unavailable, backing off");
                    tokio::time::sleep(delay).await;
                }
                continue;
            }

            if status != StatusCode::OK {
                warn!(page, %status, "Terminal status, stopping with pages collected so far");
                return Ok(PageOutcome::Truncated);
            }

            let body = response.text().await?;

            return match parse_page(page, &body) {
                Ok(parsed) if parsed.entries.is_empty() => Ok(PageOutcome::EndOfFeed),
                Ok(parsed) => {
                    info!(page, entries = parsed.entries.len(), "Fetched feed page");
                    Ok(PageOutcome::Reviews(parsed))
                }
                Err(err) => {
                    error!(page, %err, "Unparseable feed page, stopping with pages collected so far");
                    Ok(PageOutcome::Truncated)
                }
            };
        }

        Err(FeedError::RetriesExhausted {
            page,
            attempts: self.retry.max_attempts,
        })
    }
}
