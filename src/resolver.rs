//! Domain resolver
//!
//! Drives one domain through `precheck -> candidate URL -> strategy -> detect`
//! and stops at the first detector hit. The search inside a domain is strictly
//! sequential; parallelism lives in the batch driver, across domains.

use std::fmt;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::detectors::{DetectorChain, LogoMatch};
use crate::diagnostics::{Diagnostics, ResolveEvent};
use crate::domain_utils::{generate_domain_urls, normalize_domain};
use crate::fetch::{default_strategies, FetchError, FetchStrategy};
use crate::precheck::{AlwaysReachable, ConnectivityProbe, HttpPrechecker};

pub const LOGO_NOT_FOUND: &str = "logo_not_found";
pub const REQUEST_FAILED: &str = "request_failed";
pub const NOT_WORKING_SITE: &str = "not_working_site";

/// Terminal outcome for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Logo(LogoMatch),
    /// Markup was fetched at least once but no detector matched
    LogoNotFound,
    /// No strategy ever produced content for any candidate URL
    RequestFailed,
    /// The domain name does not resolve
    NotWorkingSite,
}

impl ResolutionResult {
    /// The value written to the `logo_url` report column
    pub fn report_value(&self) -> &str {
        match self {
            ResolutionResult::Logo(found) => &found.value,
            ResolutionResult::LogoNotFound => LOGO_NOT_FOUND,
            ResolutionResult::RequestFailed => REQUEST_FAILED,
            ResolutionResult::NotWorkingSite => NOT_WORKING_SITE,
        }
    }

    pub fn is_logo(&self) -> bool {
        matches!(self, ResolutionResult::Logo(_))
    }
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.report_value())
    }
}

pub struct DomainResolver {
    probe: Arc<dyn ConnectivityProbe>,
    strategies: Vec<Box<dyn FetchStrategy>>,
    detectors: DetectorChain,
}

impl DomainResolver {
    pub fn new(
        probe: Arc<dyn ConnectivityProbe>,
        strategies: Vec<Box<dyn FetchStrategy>>,
        detectors: DetectorChain,
    ) -> Self {
        Self {
            probe,
            strategies,
            detectors,
        }
    }

    /// Production wiring: HTTP precheck, both fetch strategies, full detector chain
    pub fn from_config(config: &AppConfig, skip_precheck: bool) -> Result<Self, FetchError> {
        let probe: Arc<dyn ConnectivityProbe> = if skip_precheck {
            Arc::new(AlwaysReachable)
        } else {
            Arc::new(HttpPrechecker::from_config(config)?)
        };
        Ok(Self::new(
            probe,
            default_strategies(config)?,
            DetectorChain::standard(config.detectors.svg_encoding),
        ))
    }

    pub async fn resolve(&self, domain: &str, diagnostics: &dyn Diagnostics) -> ResolutionResult {
        let domain = normalize_domain(domain);
        let result = self.search(domain, diagnostics).await;
        diagnostics.record(
            domain,
            ResolveEvent::Resolved {
                result: result.to_string(),
            },
        );
        result
    }

    async fn search(&self, domain: &str, diagnostics: &dyn Diagnostics) -> ResolutionResult {
        let connectivity = self.probe.probe(domain).await;
        diagnostics.record(
            domain,
            ResolveEvent::PrecheckFinished {
                outcome: connectivity.to_string(),
            },
        );
        if connectivity.is_dead() {
            return ResolutionResult::NotWorkingSite;
        }

        let mut fetched_any_content = false;

        for url in generate_domain_urls(domain) {
            diagnostics.record(domain, ResolveEvent::CandidateStarted { url: url.clone() });

            for strategy in &self.strategies {
                diagnostics.record(
                    domain,
                    ResolveEvent::StrategyAttempt {
                        strategy: strategy.name().to_string(),
                        url: url.clone(),
                    },
                );

                let page = match strategy.fetch(&url).await {
                    Ok(page) => page,
                    Err(e) => {
                        diagnostics.record(
                            domain,
                            ResolveEvent::StrategyFailed {
                                strategy: strategy.name().to_string(),
                                url: url.clone(),
                                error: e.to_string(),
                            },
                        );
                        continue;
                    }
                };

                fetched_any_content = true;
                diagnostics.record(
                    domain,
                    ResolveEvent::StrategySucceeded {
                        strategy: strategy.name().to_string(),
                        url: url.clone(),
                        resolved_url: page.resolved_url.clone(),
                        bytes: page.content.len(),
                    },
                );

                // Parsed document is dropped before the next await
                if let Some(found) =
                    self.detectors
                        .detect_in_markup(&page.content, &page.resolved_url, domain, diagnostics)
                {
                    return ResolutionResult::Logo(found);
                }
                // No match in this markup; another request shape may serve a richer page
            }
        }

        if fetched_any_content {
            ResolutionResult::LogoNotFound
        } else {
            ResolutionResult::RequestFailed
        }
    }
}
