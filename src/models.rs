use serde::{Deserialize, Serialize};

/// Column order of the CSV export. Must match the serialized field order
/// of [`ReviewRecord`].
pub const FIELD_NAMES: [&str; 10] = [
    "id",
    "updated",
    "title",
    "comment",
    "voteSum",
    "voteCount",
    "rating",
    "version",
    "name",
    "uri",
];

/// One customer review, flattened from a feed entry.
///
/// All fields are carried verbatim as the feed provides them; vote counts
/// and rating stay strings, and `id` uniqueness is never checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: String,
    pub updated: String,
    pub title: String,
    pub comment: String,
    #[serde(rename = "voteSum")]
    pub vote_sum: String,
    #[serde(rename = "voteCount")]
    pub vote_count: String,
    pub rating: String,
    pub version: String,
    pub name: String,
    pub uri: String,
}

impl ReviewRecord {
    /// Field values in header order.
    pub fn as_row(&self) -> [&str; 10] {
        [
            &self.id,
            &self.updated,
            &self.title,
            &self.comment,
            &self.vote_sum,
            &self.vote_count,
            &self.rating,
            &self.version,
            &self.name,
            &self.uri,
        ]
    }
}
