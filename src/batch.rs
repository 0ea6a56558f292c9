//! Batch driver
//!
//! Reads domains, resolves them with bounded parallelism, and writes one report
//! row per domain in input order. Supports:
//! - newline-delimited input from stdin or a file
//! - JSON files holding an array of domain strings (or `{"domains": [...]}`)
//! - cancellation from Ctrl-C without emitting partial rows
//! - an outcome tally exported as a JSON summary

use anyhow::{bail, Context, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::diagnostics::Diagnostics;
use crate::export::ReportWriter;
use crate::logger::BatchProgress;
use crate::resolver::{DomainResolver, ResolutionResult};

/// Input format for domain files
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    /// One domain per line
    Lines,
    /// JSON array of domain strings
    Json,
}

impl InputFormat {
    /// Detect format from file extension; anything that is not `.json` is line-based
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).as_deref() {
            Some("json") => Self::Json,
            _ => Self::Lines,
        }
    }
}

/// Read newline-delimited domains. Lines are trimmed and blank lines skipped;
/// nothing else is validated.
pub fn read_domains<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut domains = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read input line")?;
        let domain = line.trim();
        if !domain.is_empty() {
            domains.push(domain.to_string());
        }
    }
    Ok(domains)
}

/// Parse domain list from a file (format from extension)
pub fn parse_domain_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    match InputFormat::from_path(path) {
        InputFormat::Lines => read_domains(content.as_bytes()),
        InputFormat::Json => parse_json_domains(&content),
    }
}

/// Parse domains from JSON content
///
/// Supports:
/// 1. Array of domain strings: `["example.com", "test.org"]`
/// 2. Object with "domains" array: `{"domains": ["example.com"]}`
///
/// Non-string elements and blank strings are skipped.
pub fn parse_json_domains(content: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(content).context("Failed to parse JSON content")?;

    let items = match &value {
        serde_json::Value::Array(arr) => arr,
        serde_json::Value::Object(obj) => match obj.get("domains") {
            Some(serde_json::Value::Array(arr)) => arr,
            Some(_) => bail!("'domains' field must be an array"),
            None => bail!("JSON object must have a 'domains' array field"),
        },
        _ => bail!("JSON must be an array of domains or an object with 'domains' field"),
    };

    Ok(items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect())
}

/// Summary bucket for one resolved domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCategory {
    /// A real URL or inline SVG
    Success,
    /// CSS-background sentinel
    Weak,
    FailedOrNotFound,
    NotWorkingSite,
}

impl From<&ResolutionResult> for OutcomeCategory {
    fn from(result: &ResolutionResult) -> Self {
        match result {
            ResolutionResult::Logo(found) if found.is_weak() => OutcomeCategory::Weak,
            ResolutionResult::Logo(_) => OutcomeCategory::Success,
            ResolutionResult::LogoNotFound | ResolutionResult::RequestFailed => OutcomeCategory::FailedOrNotFound,
            ResolutionResult::NotWorkingSite => OutcomeCategory::NotWorkingSite,
        }
    }
}

/// Result of resolving a single domain in a batch
#[derive(Debug, Clone, Serialize)]
pub struct DomainOutcome {
    pub domain: String,
    pub logo_url: String,
    pub category: OutcomeCategory,
    pub duration_secs: f64,
}

impl DomainOutcome {
    pub fn new(domain: String, result: &ResolutionResult, duration: Duration) -> Self {
        Self {
            domain,
            logo_url: result.report_value().to_string(),
            category: result.into(),
            duration_secs: duration.as_secs_f64(),
        }
    }
}

/// Summary of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Domains that completed (and got a report row)
    pub total_domains: usize,
    pub success: usize,
    pub weak: usize,
    pub failed_or_not_found: usize,
    pub not_working_sites: usize,
    /// True when the run was interrupted before every domain completed
    pub cancelled: bool,
    pub domain_results: Vec<DomainOutcome>,
    pub total_duration_secs: f64,
    pub started_at: String,
    pub completed_at: String,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self {
            total_domains: 0,
            success: 0,
            weak: 0,
            failed_or_not_found: 0,
            not_working_sites: 0,
            cancelled: false,
            domain_results: Vec::new(),
            total_duration_secs: 0.0,
            started_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            completed_at: String::new(),
        }
    }

    pub fn record(&mut self, outcome: DomainOutcome) {
        match outcome.category {
            OutcomeCategory::Success => self.success += 1,
            OutcomeCategory::Weak => self.weak += 1,
            OutcomeCategory::FailedOrNotFound => self.failed_or_not_found += 1,
            OutcomeCategory::NotWorkingSite => self.not_working_sites += 1,
        }
        self.total_domains += 1;
        self.domain_results.push(outcome);
    }

    /// Finalize with end time
    pub fn finalize(&mut self, elapsed: Duration) {
        self.total_duration_secs = elapsed.as_secs_f64();
        self.completed_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    }

    pub fn summary_line(&self) -> String {
        format!(
            "SUMMARY: success={}, weak={}, failed_or_not_found={}, not_working_sites={}",
            self.success, self.weak, self.failed_or_not_found, self.not_working_sites
        )
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once the run is cancelled; never resolves if the sender goes away
/// without cancelling.
async fn cancelled(mut cancel: watch::Receiver<bool>) {
    if cancel.wait_for(|flag| *flag).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Resolve every domain and stream rows to `report` in input order.
///
/// At most `parallel` domains are in flight. When `cancel` flips to `true`,
/// pending domains are dropped and the summary is returned with
/// `cancelled = true`; rows already written stay whole.
pub async fn run_batch<W: Write>(
    resolver: Arc<DomainResolver>,
    domains: Vec<String>,
    parallel: usize,
    report: &mut ReportWriter<W>,
    diagnostics: Arc<dyn Diagnostics>,
    cancel: watch::Receiver<bool>,
    progress: &BatchProgress,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::new();
    let batch_start = Instant::now();
    let parallel = parallel.max(1);

    info!("Starting batch of {} domains ({} in parallel)", domains.len(), parallel);

    let mut outcomes = stream::iter(domains.into_iter().map(|domain| {
        let resolver = resolver.clone();
        let diagnostics = diagnostics.clone();
        let cancel = cancel.clone();

        async move {
            let domain_start = Instant::now();
            let result = tokio::select! {
                result = resolver.resolve(&domain, diagnostics.as_ref()) => Some(result),
                _ = cancelled(cancel) => None,
            };
            result.map(|r| DomainOutcome::new(domain, &r, domain_start.elapsed()))
        }
    }))
    .buffered(parallel);

    while let Some(outcome) = outcomes.next().await {
        let Some(outcome) = outcome else {
            warn!("Batch cancelled after {} domains", summary.total_domains);
            summary.cancelled = true;
            break;
        };

        report.write_row(&outcome.domain, &outcome.logo_url)?;
        progress.advance(&outcome.domain);
        summary.record(outcome);
    }

    summary.finalize(batch_start.elapsed());
    Ok(summary)
}
