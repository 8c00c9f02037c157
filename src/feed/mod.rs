pub mod client;
pub mod parser;

pub use client::FeedClient;
pub use parser::{ContentElement, Entry, Page};
