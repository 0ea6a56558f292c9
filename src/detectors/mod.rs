//! Logo detectors
//!
//! Each detector looks for one markup pattern that usually marks a brand logo.
//! The chain runs them in a fixed priority order against one parsed document
//! and stops at the first match:
//!
//! 1. [`SvgLogoDetector`] - inline `<svg class="…logo…">` inside a logo container
//! 2. [`NavbarBrandDetector`] - `<img alt="…logo…">` inside a logo/brand link
//! 3. [`ExplicitLogoDetector`] - any `<img>` with "logo" in its src, id or class
//! 4. [`MetaTagDetector`] - `og:image`
//! 5. [`CssBackgroundDetector`] - logo/brand containers likely styled with a
//!    CSS background (weak hit, no URL)

pub mod css_background;
pub mod explicit;
pub mod meta;
pub mod navbar;
pub mod svg;

pub use css_background::{CssBackgroundDetector, CSS_BACKGROUND_SENTINEL};
pub use explicit::ExplicitLogoDetector;
pub use meta::MetaTagDetector;
pub use navbar::NavbarBrandDetector;
pub use svg::SvgLogoDetector;

use scraper::{ElementRef, Html};
use std::fmt;
use thiserror::Error;

use crate::config::SvgEncoding;
use crate::diagnostics::{Diagnostics, ResolveEvent};
use crate::url_utils::UrlError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error(transparent)]
    Url(#[from] UrlError),
}

/// What kind of value a detector produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// An absolute URL to a remote image
    Url,
    /// A self-contained `data:` URL (inline SVG)
    DataUrl,
    /// A CSS-styled logo element exists, but its image cannot be read from markup
    CssBackgroundHint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoMatch {
    pub value: String,
    pub kind: MatchKind,
}

impl LogoMatch {
    pub fn url(value: impl Into<String>) -> Self {
        Self { value: value.into(), kind: MatchKind::Url }
    }

    pub fn data_url(value: impl Into<String>) -> Self {
        Self { value: value.into(), kind: MatchKind::DataUrl }
    }

    pub fn css_hint() -> Self {
        Self {
            value: CSS_BACKGROUND_SENTINEL.to_string(),
            kind: MatchKind::CssBackgroundHint,
        }
    }

    /// Weak hits signal a likely logo without a resolvable asset
    pub fn is_weak(&self) -> bool {
        self.kind == MatchKind::CssBackgroundHint
    }
}

impl fmt::Display for LogoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

pub trait LogoDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inspect the document; `base_url` is the post-redirect page URL.
    fn detect(&self, document: &Html, base_url: &str) -> Result<Option<LogoMatch>, DetectError>;
}

/// Ordered detectors; the first non-empty result wins
pub struct DetectorChain {
    detectors: Vec<Box<dyn LogoDetector>>,
}

impl DetectorChain {
    pub fn new(detectors: Vec<Box<dyn LogoDetector>>) -> Self {
        Self { detectors }
    }

    /// All detectors in priority order
    pub fn standard(svg_encoding: SvgEncoding) -> Self {
        Self::new(vec![
            Box::new(SvgLogoDetector::new(svg_encoding)),
            Box::new(NavbarBrandDetector),
            Box::new(ExplicitLogoDetector),
            Box::new(MetaTagDetector),
            Box::new(CssBackgroundDetector),
        ])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Parse markup and run the chain. The parsed document lives only for the
    /// duration of this call.
    pub fn detect_in_markup(
        &self,
        markup: &str,
        base_url: &str,
        domain: &str,
        diagnostics: &dyn Diagnostics,
    ) -> Option<LogoMatch> {
        let document = Html::parse_document(markup);
        self.evaluate(&document, base_url, domain, diagnostics)
    }

    pub fn evaluate(
        &self,
        document: &Html,
        base_url: &str,
        domain: &str,
        diagnostics: &dyn Diagnostics,
    ) -> Option<LogoMatch> {
        for detector in &self.detectors {
            let detector_name = detector.name().to_string();
            match detector.detect(document, base_url) {
                Ok(Some(found)) => {
                    diagnostics.record(
                        domain,
                        ResolveEvent::DetectorMatched {
                            detector: detector_name,
                            value: found.value.clone(),
                        },
                    );
                    return Some(found);
                }
                Ok(None) => {
                    diagnostics.record(domain, ResolveEvent::DetectorMissed { detector: detector_name });
                }
                Err(e) => {
                    diagnostics.record(
                        domain,
                        ResolveEvent::DetectorFailed {
                            detector: detector_name,
                            error: e.to_string(),
                        },
                    );
                }
            }
        }
        None
    }
}

// Shared element helpers

/// Case-insensitive substring test on an attribute value
pub(crate) fn attr_contains(element: &ElementRef<'_>, attr: &str, needle: &str) -> bool {
    element
        .value()
        .attr(attr)
        .map(|v| v.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Lazy-load source (`data-src`) if present, else `src`; empty values are skipped
pub(crate) fn image_source<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    let value = element.value();
    value
        .attr("data-src")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| value.attr("src").filter(|s| !s.trim().is_empty()))
        .map(str::trim)
}
