use anyhow::{Context, Result};
use csv::Writer;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::batch::BatchSummary;

pub const REPORT_HEADER: [&str; 2] = ["domain", "logo_url"];

/// Streaming `domain,logo_url` report. The header is written on creation and
/// every row is flushed immediately, so an interrupted run leaves only whole rows.
pub struct ReportWriter<W: Write> {
    writer: Writer<W>,
    rows: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(REPORT_HEADER).context("Failed to write report header")?;
        writer.flush().context("Failed to flush report header")?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_row(&mut self, domain: &str, logo_url: &str) -> Result<()> {
        self.writer
            .write_record([domain, logo_url])
            .with_context(|| format!("Failed to write report row for {}", domain))?;
        self.writer.flush().context("Failed to flush report row")?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish report: {}", e.error()))
    }
}

/// Report to `output_path`, or stdout when no path is given
pub fn open_report(output_path: Option<&Path>) -> Result<ReportWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match output_path {
        Some(path) => {
            debug!("Writing report to {}", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };
    ReportWriter::new(sink)
}

/// Export batch summary to JSON file
pub fn export_batch_summary(summary: &BatchSummary, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize batch summary")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write batch summary to: {}", output_path.display()))?;

    info!("Exported batch summary for {} domains to {}", summary.total_domains, output_path.display());
    Ok(())
}
