//! Connectivity precheck
//!
//! One lightweight request per domain separates "the name does not resolve"
//! from every other kind of failure. Only a DNS failure is fatal: refused
//! connections, timeouts and TLS errors are inconclusive because an `about.`
//! subdomain may still serve a page.

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain_utils;
use crate::fetch::FetchError;
use crate::net_utils::{chain_any, error_chain_text};

/// Result of the reachability probe
#[derive(Debug, Clone, PartialEq)]
pub enum Connectivity {
    /// The site answered (any status code)
    Reachable,
    /// The probe failed for a reason other than name resolution
    Inconclusive(String),
    /// The domain name does not resolve; the domain is abandoned
    DnsFailure(String),
}

impl Connectivity {
    pub fn is_dead(&self) -> bool {
        matches!(self, Connectivity::DnsFailure(_))
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Reachable => write!(f, "reachable"),
            Connectivity::Inconclusive(reason) => write!(f, "inconclusive ({})", reason),
            Connectivity::DnsFailure(reason) => write!(f, "dns failure ({})", reason),
        }
    }
}

#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn probe(&self, domain: &str) -> Connectivity;
}

/// Probe that issues a plain GET to `https://{domain}`
pub struct HttpPrechecker {
    client: reqwest::Client,
}

impl HttpPrechecker {
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(config.precheck.timeout(), config.http.max_redirects)
    }

    pub fn new(timeout: Duration, max_redirects: usize) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Probe an explicit URL
    pub async fn probe_url(&self, url: &str) -> Connectivity {
        match self.client.get(url).send().await {
            Ok(response) => {
                debug!("Precheck {} answered with status {}", url, response.status());
                Connectivity::Reachable
            }
            Err(e) => {
                let chain = error_chain_text(&e);
                if is_dns_failure(&e) {
                    debug!("Site appears non-functional (DNS resolution failure): {}", chain);
                    Connectivity::DnsFailure(chain)
                } else {
                    debug!("Precheck for {} inconclusive: {}", url, chain);
                    Connectivity::Inconclusive(chain)
                }
            }
        }
    }
}

#[async_trait]
impl ConnectivityProbe for HttpPrechecker {
    async fn probe(&self, domain: &str) -> Connectivity {
        self.probe_url(&domain_utils::precheck_url(domain)).await
    }
}

/// Probe that never fails, for callers that want to skip the precheck
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysReachable;

#[async_trait]
impl ConnectivityProbe for AlwaysReachable {
    async fn probe(&self, _domain: &str) -> Connectivity {
        Connectivity::Reachable
    }
}

const DNS_ERROR_MARKERS: &[&str] = &[
    "dns error",
    "could not resolve host",
    "name or service not known",
    "name resolution failed",
    "failed to lookup address",
    "no such host is known",
    "nodename nor servname provided",
];

/// True if any error in the source chain describes a name-resolution failure
pub fn is_dns_failure(error: &(dyn StdError + 'static)) -> bool {
    chain_any(error, is_dns_message)
}

fn is_dns_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    DNS_ERROR_MARKERS.iter().any(|marker| lower.contains(marker))
}
