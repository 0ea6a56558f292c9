use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use logofinder::batch::{parse_domain_file, read_domains, run_batch};
use logofinder::cli::Cli;
use logofinder::config::{self, AppConfig};
use logofinder::diagnostics::{Diagnostics, TracingDiagnostics};
use logofinder::export::{export_batch_summary, open_report};
use logofinder::logger::{init_tracing, BatchProgress, VerbosityLevel};
use logofinder::resolver::DomainResolver;

/// 130 = 128 + SIGINT(2), standard exit code for Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle --init flag first (before any other processing)
    if cli.init {
        match AppConfig::create_default_config() {
            Ok(path) => {
                eprintln!("✅ Created default configuration file at: {}", path.display());
                eprintln!("   Edit this file to customize settings, then run logofinder again.");
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("❌ Failed to create configuration file: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = cli.validate() {
        eprintln!("❌ Invalid arguments: {}", e);
        std::process::exit(2);
    }

    let verbosity = VerbosityLevel::from_flags(cli.quiet, cli.verbose);
    init_tracing(verbosity)?;

    let mut app_config = match AppConfig::load_or_embedded(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(config::ConfigError::FileNotFound(path)) => {
            eprintln!("❌ Configuration file not found at: {}", path.display());
            eprintln!("   Run with --init to create a default configuration file.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut app_config);
    debug!("Effective configuration: {:?}", app_config);

    // First Ctrl-C stops scheduling and lets written rows stand; a second one exits at once
    let (cancel_tx, cancel_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        if cancel_tx.send_replace(true) {
            std::process::exit(EXIT_INTERRUPTED);
        }
        eprintln!("\n⚠️  Interrupt received. Stopping after completed domains...");
    })
    .unwrap_or_else(|e| {
        warn!("Failed to set Ctrl-C handler: {}. Interrupt signals may not be handled gracefully.", e);
    });

    let domains = match &cli.input_file {
        Some(path) => parse_domain_file(path)?,
        None => read_domains(io::stdin().lock()).context("Failed to read domains from stdin")?,
    };

    let resolver = Arc::new(
        DomainResolver::from_config(&app_config, cli.skip_precheck).context("Failed to build HTTP clients")?,
    );
    let diagnostics: Arc<dyn Diagnostics> = Arc::new(TracingDiagnostics);
    let progress = BatchProgress::for_terminal(domains.len() as u64, !cli.no_progress, verbosity);
    let mut report = open_report(cli.output.as_deref())?;

    let summary = run_batch(
        resolver,
        domains,
        app_config.batch.parallel,
        &mut report,
        diagnostics,
        cancel_rx,
        &progress,
    )
    .await?;

    progress.finish();
    report.into_inner()?;

    eprintln!("{}", summary.summary_line());

    if let Some(path) = &cli.summary_json {
        export_batch_summary(&summary, path)?;
    }

    if summary.cancelled {
        std::process::exit(EXIT_INTERRUPTED);
    }

    Ok(())
}
