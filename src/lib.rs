pub mod config;
pub mod error;
pub mod extractor;
pub mod feed;
pub mod models;
pub mod orchestrator;
pub mod sink;

pub use config::Config;
pub use error::{ExtractError, FeedError};
pub use feed::{FeedClient, Page};
pub use models::ReviewRecord;
pub use orchestrator::{HarvestReport, Harvester};
pub use sink::{CsvSink, Sink};
