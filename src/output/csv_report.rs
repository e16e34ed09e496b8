//! CSV report of every crawled page
//!
//! The report is `;`-delimited with one row per page. List-valued columns
//! are joined with `,`.

use crate::output::traits::{OutputResult, ReportWriter};
use crate::state::PageRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names, in order
pub const CSV_HEADERS: [&str; 6] = [
    "page_url",
    "h1",
    "first_paragraph",
    "outgoing_link_urls",
    "image_urls",
    "references",
];

const DELIMITER: u8 = b';';

/// [`ReportWriter`] producing the `;`-delimited page report
///
/// `page_url` is the URL each page was first reached by, not its canonical key.
pub struct CsvReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvReportWriter<File> {
    /// Creates (or truncates) the report file at `path`
    pub fn from_path(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvReportWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_writer(inner);
        Self { writer }
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::output::OutputError::Write(e.error().to_string()))
    }
}

impl<W: Write> ReportWriter for CsvReportWriter<W> {
    fn write_report(&mut self, pages: &[PageRecord]) -> OutputResult<()> {
        self.writer.write_record(CSV_HEADERS)?;

        for page in pages {
            self.writer.write_record([
                page.url.as_str(),
                page.heading.as_deref().unwrap_or(""),
                page.first_paragraph.as_deref().unwrap_or(""),
                page.outgoing_links.join(",").as_str(),
                page.image_urls.join(",").as_str(),
                page.visits.to_string().as_str(),
            ])?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the page report for `pages` to `path`
pub fn write_csv_report(pages: &[PageRecord], path: &Path) -> OutputResult<()> {
    let mut writer = CsvReportWriter::from_path(path)?;
    writer.write_report(pages)?;
    tracing::info!("Wrote report for {} pages to {}", pages.len(), path.display());
    Ok(())
}
