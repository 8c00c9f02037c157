use crate::error::ExtractError;
use crate::feed::{Entry, Page};
use crate::models::ReviewRecord;

/// Flatten every entry of a page into a review record, one result per
/// entry in document order. A failed entry never aborts the rest of the
/// page.
pub fn extract(page: &Page) -> Vec<Result<ReviewRecord, ExtractError>> {
    page.entries.iter().map(extract_entry).collect()
}

fn extract_entry(entry: &Entry) -> Result<ReviewRecord, ExtractError> {
    // The comment lives in the content element typed "text"; the sibling
    // "html" rendering is ignored.
    let comment = entry
        .contents
        .iter()
        .find(|c| c.ctype == "text")
        .map(|c| c.text.clone())
        .ok_or_else(|| missing(entry, "content[type=text]"))?;

    Ok(ReviewRecord {
        id: require(entry, &entry.id, "id")?,
        updated: require(entry, &entry.updated, "updated")?,
        title: require(entry, &entry.title, "title")?,
        comment,
        vote_sum: require(entry, &entry.vote_sum, "im:voteSum")?,
        vote_count: require(entry, &entry.vote_count, "im:voteCount")?,
        rating: require(entry, &entry.rating, "im:rating")?,
        version: require(entry, &entry.version, "im:version")?,
        name: require(entry, &entry.author_name, "author/name")?,
        uri: require(entry, &entry.author_uri, "author/uri")?,
    })
}

fn require(
    entry: &Entry,
    value: &Option<String>,
    field: &'static str,
) -> Result<String, ExtractError> {
    value.clone().ok_or_else(|| missing(entry, field))
}

fn missing(entry: &Entry, field: &'static str) -> ExtractError {
    ExtractError {
        entry_id: entry
            .id
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string()),
        field,
    }
}
