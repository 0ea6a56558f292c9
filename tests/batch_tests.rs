//! Batch driver: ordering, tallies and cancellation with scripted strategies.

use async_trait::async_trait;
use logofinder::batch::run_batch;
use logofinder::config::SvgEncoding;
use logofinder::detectors::DetectorChain;
use logofinder::diagnostics::{Diagnostics, NoopDiagnostics};
use logofinder::export::ReportWriter;
use logofinder::fetch::{FetchError, FetchOutcome, FetchStrategy, FetchedPage};
use logofinder::logger::BatchProgress;
use logofinder::precheck::{Connectivity, ConnectivityProbe};
use logofinder::DomainResolver;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// `dead.*` does not resolve; everything else is reachable
struct ScriptedProbe;

#[async_trait]
impl ConnectivityProbe for ScriptedProbe {
    async fn probe(&self, domain: &str) -> Connectivity {
        if domain.starts_with("dead.") {
            Connectivity::DnsFailure("dns error: failed to lookup address information".into())
        } else {
            Connectivity::Reachable
        }
    }
}

/// Behavior keyed on the first label of the candidate host:
/// `slow` waits, `hang` never answers, `down` fails, `plain` has no logo,
/// `css` has a CSS-only logo, anything else serves an explicit logo.
struct ScriptedSite;

#[async_trait]
impl FetchStrategy for ScriptedSite {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, url: &str) -> FetchOutcome {
        let host = url.trim_start_matches("https://").split('/').next().unwrap_or_default().to_string();
        let label = host.trim_start_matches("about.").split('.').next().unwrap_or_default().to_string();

        let content = match label.as_str() {
            "slow" => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                r#"<img id="logo" src="/slow.png">"#
            }
            "hang" => std::future::pending().await,
            "down" => return Err(FetchError::Transport("connection refused".into())),
            "plain" => "<p>nothing here</p>",
            "css" => r#"<div class="brand-logo"></div>"#,
            _ => r#"<img id="logo" src="/logo.png">"#,
        };

        Ok(FetchedPage {
            content: content.to_string(),
            resolved_url: format!("https://{}/", host),
        })
    }
}

fn resolver() -> Arc<DomainResolver> {
    Arc::new(DomainResolver::new(
        Arc::new(ScriptedProbe),
        vec![Box::new(ScriptedSite)],
        DetectorChain::standard(SvgEncoding::Percent),
    ))
}

fn diagnostics() -> Arc<dyn Diagnostics> {
    Arc::new(NoopDiagnostics)
}

fn domains(list: &[&str]) -> Vec<String> {
    list.iter().map(|d| d.to_string()).collect()
}

#[tokio::test]
async fn test_rows_follow_input_order_despite_completion_order() {
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let mut report = ReportWriter::new(Vec::new()).unwrap();

    let summary = run_batch(
        resolver(),
        domains(&["slow.test", "fast.test", "dead.test", "down.test", "plain.test", "css.test"]),
        4,
        &mut report,
        diagnostics(),
        cancel_rx,
        &BatchProgress::hidden(),
    )
    .await
    .unwrap();

    let output = String::from_utf8(report.into_inner().unwrap()).unwrap();
    assert_eq!(
        output,
        "domain,logo_url\n\
         slow.test,https://slow.test/slow.png\n\
         fast.test,https://fast.test/logo.png\n\
         dead.test,not_working_site\n\
         down.test,request_failed\n\
         plain.test,logo_not_found\n\
         css.test,css_background_logo_found\n"
    );
    assert_eq!(
        summary.summary_line(),
        "SUMMARY: success=2, weak=1, failed_or_not_found=2, not_working_sites=1"
    );
    assert!(!summary.cancelled);
    assert_eq!(summary.total_domains, 6);
}

#[tokio::test]
async fn test_cancellation_writes_only_completed_rows() {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let mut report = ReportWriter::new(Vec::new()).unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = cancel_tx.send(true);
    });

    let summary = run_batch(
        resolver(),
        domains(&["first.test", "hang.test", "third.test"]),
        2,
        &mut report,
        diagnostics(),
        cancel_rx,
        &BatchProgress::hidden(),
    )
    .await
    .unwrap();

    let output = String::from_utf8(report.into_inner().unwrap()).unwrap();
    assert_eq!(output, "domain,logo_url\nfirst.test,https://first.test/logo.png\n");
    assert!(summary.cancelled);
    assert_eq!(summary.total_domains, 1);
}

#[tokio::test]
async fn test_dropped_cancel_sender_does_not_cancel() {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    drop(cancel_tx);
    let mut report = ReportWriter::new(Vec::new()).unwrap();

    let summary = run_batch(
        resolver(),
        domains(&["a.test", "b.test"]),
        1,
        &mut report,
        diagnostics(),
        cancel_rx,
        &BatchProgress::hidden(),
    )
    .await
    .unwrap();

    assert!(!summary.cancelled);
    assert_eq!(report.rows_written(), 2);
}

#[tokio::test]
async fn test_empty_input_writes_header_only() {
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let mut report = ReportWriter::new(Vec::new()).unwrap();

    let summary = run_batch(resolver(), Vec::new(), 4, &mut report, diagnostics(), cancel_rx, &BatchProgress::hidden())
        .await
        .unwrap();

    assert_eq!(String::from_utf8(report.into_inner().unwrap()).unwrap(), "domain,logo_url\n");
    assert_eq!(
        summary.summary_line(),
        "SUMMARY: success=0, weak=0, failed_or_not_found=0, not_working_sites=0"
    );
}

#[tokio::test]
async fn test_progress_advances_per_row() {
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let mut report = ReportWriter::new(Vec::new()).unwrap();
    let progress = BatchProgress::hidden();

    run_batch(resolver(), domains(&["a.test", "b.test", "c.test"]), 2, &mut report, diagnostics(), cancel_rx, &progress)
        .await
        .unwrap();

    assert_eq!(progress.position(), 3);
}
