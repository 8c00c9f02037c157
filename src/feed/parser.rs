use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::FeedError;

/// Parse result for one feed page. Constructed per fetch, discarded after
/// extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub entries: Vec<Entry>,
}

/// One review as the feed represents it, before extraction. Fields stay
/// optional here; the extractor decides what a missing one means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub id: Option<String>,
    pub updated: Option<String>,
    pub title: Option<String>,
    pub vote_sum: Option<String>,
    pub vote_count: Option<String>,
    pub rating: Option<String>,
    pub version: Option<String>,
    pub author_name: Option<String>,
    pub author_uri: Option<String>,
    /// All `<content>` elements of the entry, in document order.
    pub contents: Vec<ContentElement>,
}

/// A `<content>` element with its `type` attribute and inner text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentElement {
    pub ctype: String,
    pub text: String,
}

impl Entry {
    fn set_field(&mut self, tag: &str, in_author: bool, text: &str) {
        let slot = match (in_author, tag) {
            (true, "name") => &mut self.author_name,
            (true, "uri") => &mut self.author_uri,
            (false, "id") => &mut self.id,
            (false, "updated") => &mut self.updated,
            (false, "title") => &mut self.title,
            (false, "im:voteSum") => &mut self.vote_sum,
            (false, "im:voteCount") => &mut self.vote_count,
            (false, "im:rating") => &mut self.rating,
            (false, "im:version") => &mut self.version,
            _ => return,
        };
        *slot = Some(text.to_string());
    }
}

fn attr_value(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Parse one page of the customer-review Atom feed.
///
/// Only `<entry>` children are captured; feed-level `<id>`, `<title>` and
/// `<author>` never leak into entries.
pub fn parse_page(number: u32, xml: &str) -> Result<Page, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut entry: Option<Entry> = None;
    let mut in_author = false;
    let mut saw_feed = false;
    let mut current_tag = String::new();
    // Set while inside a <content> element
    let mut content_type: Option<String> = None;
    let mut content_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "feed" => saw_feed = true,
                    "entry" => entry = Some(Entry::default()),
                    "author" if entry.is_some() => in_author = true,
                    "content" if entry.is_some() => {
                        content_type = Some(attr_value(&e, "type").unwrap_or_default());
                        content_text.clear();
                    }
                    _ => {}
                }
                current_tag = name;
            }
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"feed" {
                    saw_feed = true;
                }
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| FeedError::Parse(e.to_string()))?
                    .to_string();
                if content_type.is_some() {
                    content_text.push_str(&text);
                } else if let Some(ref mut entry) = entry {
                    entry.set_field(&current_tag, in_author, &text);
                }
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"entry" => {
                        if let Some(done) = entry.take() {
                            entries.push(done);
                        }
                        in_author = false;
                    }
                    b"author" => in_author = false,
                    b"content" => {
                        if let (Some(ctype), Some(entry)) = (content_type.take(), entry.as_mut()) {
                            entry.contents.push(ContentElement {
                                ctype,
                                text: std::mem::take(&mut content_text),
                            });
                        }
                    }
                    _ => {}
                }
                current_tag.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(e.to_string())),
            _ => {}
        }
    }

    if !saw_feed {
        return Err(FeedError::Parse("document has no feed element".to_string()));
    }

    Ok(Page { number, entries })
}
