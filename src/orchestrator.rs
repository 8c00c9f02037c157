use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::extractor;
use crate::feed::FeedClient;
use crate::models::ReviewRecord;
use crate::sink::Sink;

/// Drives the fetch → extract → export pipeline. Owns the accumulated
/// collection for the whole run.
pub struct Harvester<S: Sink> {
    client: FeedClient,
    sink: S,
}

/// Outcome of one completed run.
pub struct HarvestReport {
    /// Collected reviews, discovery order (pages ascending, feed order
    /// within a page).
    pub records: Vec<ReviewRecord>,
    /// Entries dropped because a field was missing.
    pub skipped: usize,
    pub output: PathBuf,
}

impl<S: Sink> Harvester<S> {
    pub fn new(client: FeedClient, sink: S) -> Self {
        Self { client, sink }
    }

    pub async fn run(&self, app_id: &str, start_page: u32) -> Result<HarvestReport> {
        info!(app_id, start_page, "Starting review harvest");

        let pages = self
            .client
            .fetch_all(app_id, start_page)
            .await
            .context("Feed walk failed")?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for page in &pages {
            for outcome in extractor::extract(page) {
                match outcome {
                    Ok(record) => records.push(record),
                    Err(err) => {
                        warn!(page = page.number, %err, "Skipping entry");
                        skipped += 1;
                    }
                }
            }
        }

        let output = self
            .sink
            .write(&records)
            .context("Failed to write export")?;

        info!(
            pages = pages.len(),
            reviews = records.len(),
            skipped,
            "Harvest complete"
        );

        Ok(HarvestReport {
            records,
            skipped,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeedConfig, RetryConfig};
    use crate::feed::parser::fixtures::{empty_feed, feed_body};
    use crate::sink::CsvSink;
    use std::fs;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const APP_ID: &str = "1200050042";

    fn page_path(page: u32) -> String {
        format!("/ca/rss/customerreviews/page={page}/id={APP_ID}/sortby=mostrecent/xml")
    }

    fn harvester(base_url: String, out_dir: &std::path::Path) -> Harvester<CsvSink> {
        let feed = FeedConfig {
            base_url,
            ..FeedConfig::default()
        };
        let retry = RetryConfig {
            max_attempts: 3,
            base_delay_ms: 5,
        };
        let client = FeedClient::new(feed, retry).unwrap();
        let sink = CsvSink::new(out_dir).unwrap();
        Harvester::new(client, sink)
    }

    #[tokio::test]
    async fn test_two_entries_then_empty_page_writes_two_rows() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(page_path(1)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(feed_body(&[("1", "great"), ("2", "bad")]), "application/atom+xml"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(page_path(2)))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(empty_feed(), "application/atom+xml"),
            )
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let report = harvester(server.uri(), dir.path())
            .run(APP_ID, 1)
            .await
            .unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.records[0].id, "1");
        assert_eq!(report.records[0].comment, "great");
        assert_eq!(report.records[1].id, "2");
        assert_eq!(report.records[1].comment, "bad");

        let content = fs::read_to_string(&report.output).unwrap();
        // header plus one row per review
        assert_eq!(content.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_503_then_200_still_yields_one_row() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(page_path(1)))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(page_path(1)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(feed_body(&[("1", "solid")]), "application/atom+xml"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(page_path(2)))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(empty_feed(), "application/atom+xml"),
            )
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let report = harvester(server.uri(), dir.path())
            .run(APP_ID, 1)
            .await
            .unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].comment, "solid");

        let content = fs::read_to_string(&report.output).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_entry_without_text_content_is_skipped_not_fatal() {
        let server = MockServer::start().await;

        // second entry carries only an html rendering
        let body = "<feed>\
            <entry><id>1</id><updated>u</updated><title>t</title>\
            <content type=\"text\">ok</content>\
            <im:voteSum>0</im:voteSum><im:voteCount>0</im:voteCount>\
            <im:rating>5</im:rating><im:version>1.0</im:version>\
            <author><name>a</name><uri>b</uri></author></entry>\
            <entry><id>2</id><updated>u</updated><title>t</title>\
            <content type=\"html\">&lt;p&gt;no text&lt;/p&gt;</content>\
            <im:voteSum>0</im:voteSum><im:voteCount>0</im:voteCount>\
            <im:rating>5</im:rating><im:version>1.0</im:version>\
            <author><name>a</name><uri>b</uri></author></entry>\
            </feed>";

        Mock::given(method("GET"))
            .and(path(page_path(1)))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/atom+xml"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(page_path(2)))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(empty_feed(), "application/atom+xml"),
            )
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let report = harvester(server.uri(), dir.path())
            .run(APP_ID, 1)
            .await
            .unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].id, "1");
        assert_eq!(report.skipped, 1);
    }
}
