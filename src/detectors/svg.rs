//! Inline SVG logos embedded directly in the markup

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{attr_contains, DetectError, LogoDetector, LogoMatch};
use crate::config::SvgEncoding;

static CONTAINER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a, div").expect("valid container selector"));
static SVG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("svg").expect("valid svg selector"));

/// Finds an `<svg>` with "logo" in its class, nested in an `<a>` or `<div>`
/// that also has "logo" in its class, and returns it as a `data:` URL.
pub struct SvgLogoDetector {
    encoding: SvgEncoding,
}

impl SvgLogoDetector {
    pub fn new(encoding: SvgEncoding) -> Self {
        Self { encoding }
    }
}

impl LogoDetector for SvgLogoDetector {
    fn name(&self) -> &'static str {
        "svg_logo"
    }

    fn detect(&self, document: &Html, _base_url: &str) -> Result<Option<LogoMatch>, DetectError> {
        for container in document.select(&CONTAINER_SELECTOR) {
            if !attr_contains(&container, "class", "logo") {
                continue;
            }
            if let Some(svg) = container
                .select(&SVG_SELECTOR)
                .find(|svg| attr_contains(svg, "class", "logo"))
            {
                return Ok(Some(LogoMatch::data_url(svg_data_url(&svg.html(), self.encoding))));
            }
        }
        Ok(None)
    }
}

/// Collapse whitespace runs to single spaces and wrap as an SVG data URL
pub fn svg_data_url(markup: &str, encoding: SvgEncoding) -> String {
    let collapsed = markup.split_whitespace().collect::<Vec<_>>().join(" ");
    match encoding {
        SvgEncoding::Percent => format!("data:image/svg+xml,{}", urlencoding::encode(&collapsed)),
        SvgEncoding::Base64 => format!("data:image/svg+xml;base64,{}", STANDARD.encode(collapsed.as_bytes())),
    }
}
