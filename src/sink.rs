use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use csv::{QuoteStyle, WriterBuilder};
use tracing::info;

use crate::models::{ReviewRecord, FIELD_NAMES};

/// Spreadsheet tools expect the export to open as UTF-8.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Destination for a completed review collection. Written once at the end
/// of a run; never partially flushed.
pub trait Sink {
    /// Write all records in one shot, returning the path written.
    fn write(&self, records: &[ReviewRecord]) -> Result<PathBuf>;
}

/// Comma-delimited export with every field quoted and a file name taken
/// from the Unix timestamp at write time.
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        Ok(Self { dir })
    }

    fn next_path(&self) -> PathBuf {
        self.dir.join(format!("{}.csv", Utc::now().timestamp()))
    }
}

impl Sink for CsvSink {
    fn write(&self, records: &[ReviewRecord]) -> Result<PathBuf> {
        let path = self.next_path();
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(UTF8_BOM)
            .context("Failed to write byte-order marker")?;

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .has_headers(false)
            .from_writer(file);

        writer.write_record(FIELD_NAMES)?;
        for record in records {
            writer.write_record(record.as_row())?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = records.len(), "Wrote review export");

        Ok(path)
    }
}
