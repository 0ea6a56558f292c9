//! Per-resolution diagnostics sink
//!
//! The resolver reports every precheck, strategy and detector attempt as a
//! [`ResolveEvent`] to a [`Diagnostics`] value supplied by the caller, instead
//! of writing to ambient global state. The binary forwards events to `tracing`;
//! tests record them and assert on what happened.

use std::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// A single structured event emitted while resolving one domain
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveEvent {
    PrecheckFinished { outcome: String },
    CandidateStarted { url: String },
    StrategyAttempt { strategy: String, url: String },
    StrategySucceeded { strategy: String, url: String, resolved_url: String, bytes: usize },
    StrategyFailed { strategy: String, url: String, error: String },
    DetectorMatched { detector: String, value: String },
    DetectorMissed { detector: String },
    DetectorFailed { detector: String, error: String },
    Resolved { result: String },
}

pub trait Diagnostics: Send + Sync {
    fn record(&self, domain: &str, event: ResolveEvent);
}

/// Forwards events to `tracing` with structured fields
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, domain: &str, event: ResolveEvent) {
        match event {
            ResolveEvent::PrecheckFinished { outcome } => {
                debug!(domain, %outcome, "connectivity precheck finished");
            }
            ResolveEvent::CandidateStarted { url } => {
                debug!(domain, %url, "trying candidate URL");
            }
            ResolveEvent::StrategyAttempt { strategy, url } => {
                debug!(domain, %strategy, %url, "trying strategy");
            }
            ResolveEvent::StrategySucceeded { strategy, url, resolved_url, bytes } => {
                info!(domain, %strategy, %url, %resolved_url, bytes, "strategy fetched content");
            }
            ResolveEvent::StrategyFailed { strategy, url, error } => {
                debug!(domain, %strategy, %url, %error, "strategy failed");
            }
            ResolveEvent::DetectorMatched { detector, value } => {
                let preview: String = value.chars().take(100).collect();
                info!(domain, %detector, value = %preview, "logo found");
            }
            ResolveEvent::DetectorMissed { detector } => {
                trace!(domain, %detector, "detector found nothing");
            }
            ResolveEvent::DetectorFailed { detector, error } => {
                warn!(domain, %detector, %error, "detector failed");
            }
            ResolveEvent::Resolved { result } => {
                info!(domain, %result, "domain resolved");
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn record(&self, _domain: &str, _event: ResolveEvent) {}
}

/// Keeps every event in memory, in order
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<(String, ResolveEvent)>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ResolveEvent> {
        match self.events.lock() {
            Ok(events) => events.iter().map(|(_, e)| e.clone()).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn events_for(&self, domain: &str) -> Vec<ResolveEvent> {
        match self.events.lock() {
            Ok(events) => events
                .iter()
                .filter(|(d, _)| d == domain)
                .map(|(_, e)| e.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn strategy_attempts(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ResolveEvent::StrategyAttempt { .. }))
            .count()
    }

    pub fn detector_evaluations(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ResolveEvent::DetectorMatched { .. }
                        | ResolveEvent::DetectorMissed { .. }
                        | ResolveEvent::DetectorFailed { .. }
                )
            })
            .count()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn record(&self, domain: &str, event: ResolveEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push((domain.to_string(), event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order_and_domain() {
        let diag = RecordingDiagnostics::new();
        diag.record("a.com", ResolveEvent::CandidateStarted { url: "https://a.com".into() });
        diag.record("b.com", ResolveEvent::StrategyAttempt { strategy: "s".into(), url: "https://b.com".into() });
        diag.record("a.com", ResolveEvent::DetectorMissed { detector: "d".into() });

        assert_eq!(diag.events().len(), 3);
        assert_eq!(diag.events_for("a.com").len(), 2);
        assert_eq!(diag.strategy_attempts(), 1);
        assert_eq!(diag.detector_evaluations(), 1);
    }

    #[test]
    fn test_tracing_diagnostics_accepts_all_events() {
        let diag = TracingDiagnostics;
        diag.record("a.com", ResolveEvent::DetectorMatched { detector: "svg".into(), value: "x".repeat(500) });
        diag.record("a.com", ResolveEvent::Resolved { result: "logo_not_found".into() });
    }
}
