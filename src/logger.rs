use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum VerbosityLevel {
    Silent = 0,    // Errors and the final summary only
    Summary = 1,   // Warnings and errors (default)
    Detailed = 2,  // Per-domain results and strategy successes
    Debug = 3,     // Every strategy and detector attempt
}

impl VerbosityLevel {
    pub fn from_verbose_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Summary,
            1 => VerbosityLevel::Detailed,
            2.. => VerbosityLevel::Debug,
        }
    }

    /// `-q` wins over any number of `-v`
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            VerbosityLevel::Silent
        } else {
            Self::from_verbose_count(verbose)
        }
    }

    /// Default filter directive for this level. Dependencies stay at `warn`.
    pub fn filter_directive(&self) -> String {
        let own = match self {
            VerbosityLevel::Silent => "error",
            VerbosityLevel::Summary => "warn",
            VerbosityLevel::Detailed => "info",
            VerbosityLevel::Debug => "trace",
        };
        let deps = if *self == VerbosityLevel::Silent { "error" } else { "warn" };
        format!("{},{}={}", deps, env!("CARGO_CRATE_NAME"), own)
    }
}

/// Install the global `tracing` subscriber, writing to stderr so stdout only
/// carries the report. `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_tracing(verbosity: VerbosityLevel) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}

/// Progress over the domains of one batch run
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| {
                    ProgressStyle::default_bar()
                        .template("{bar:40} {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                })
                .progress_chars("##-"),
        );
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// A visible bar only when stderr is a terminal, progress was not disabled,
    /// and debug output is not about to interleave with it
    pub fn for_terminal(total: u64, enabled: bool, verbosity: VerbosityLevel) -> Self {
        if enabled && verbosity < VerbosityLevel::Debug && std::io::stderr().is_terminal() {
            Self::new(total)
        } else {
            Self::hidden()
        }
    }

    pub fn advance(&self, domain: &str) {
        self.bar.set_message(domain.to_string());
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
