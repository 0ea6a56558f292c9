use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{DetectError, LogoDetector, LogoMatch};
use crate::url_utils::{is_http_url, make_absolute_url};

static OG_IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("valid og:image selector"));

/// Open Graph `og:image`; only the first tag is consulted
pub struct MetaTagDetector;

impl LogoDetector for MetaTagDetector {
    fn name(&self) -> &'static str {
        "meta_og_image"
    }

    fn detect(&self, document: &Html, base_url: &str) -> Result<Option<LogoMatch>, DetectError> {
        let Some(meta) = document.select(&OG_IMAGE_SELECTOR).next() else {
            return Ok(None);
        };
        let content = meta.value().attr("content").map(str::trim).unwrap_or_default();
        if content.is_empty() {
            return Ok(None);
        }

        let absolute = make_absolute_url(base_url, content)?;
        if is_http_url(&absolute) {
            Ok(Some(LogoMatch::url(absolute)))
        } else {
            Ok(None)
        }
    }
}
