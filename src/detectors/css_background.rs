//! Logos drawn with a CSS `background-image`
//!
//! The stylesheet is never fetched, so the image itself cannot be recovered.
//! A hit only says "this page very likely has a logo" and is reported with a
//! sentinel value instead of a URL.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{attr_contains, DetectError, LogoDetector, LogoMatch};

pub const CSS_BACKGROUND_SENTINEL: &str = "css_background_logo_found";

const CANDIDATE_SELECTORS: &[&str] = &[
    "div[class*='logo']",
    "a[class*='logo']",
    "span[class*='logo']",
    "div[id*='logo']",
    "a[id*='logo']",
    "div[class*='brand']",
    "a[class*='brand']",
    "div[id*='brand']",
];

static SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    CANDIDATE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid css background selector"))
        .collect()
});

pub struct CssBackgroundDetector;

impl LogoDetector for CssBackgroundDetector {
    fn name(&self) -> &'static str {
        "css_background"
    }

    fn detect(&self, document: &Html, _base_url: &str) -> Result<Option<LogoMatch>, DetectError> {
        for selector in SELECTORS.iter() {
            for element in document.select(selector) {
                let branded = ["class", "id"]
                    .iter()
                    .any(|attr| attr_contains(&element, attr, "logo") || attr_contains(&element, attr, "brand"));
                if branded {
                    return Ok(Some(LogoMatch::css_hint()));
                }
            }
        }
        Ok(None)
    }
}
