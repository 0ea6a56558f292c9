use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{attr_contains, image_source, DetectError, LogoDetector, LogoMatch};
use crate::url_utils::make_absolute_url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid anchor selector"));
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid img selector"));

/// `<img alt="…logo…">` inside an `<a>` whose class mentions "logo" or "brand"
pub struct NavbarBrandDetector;

impl LogoDetector for NavbarBrandDetector {
    fn name(&self) -> &'static str {
        "navbar_brand"
    }

    fn detect(&self, document: &Html, base_url: &str) -> Result<Option<LogoMatch>, DetectError> {
        for anchor in document.select(&ANCHOR_SELECTOR) {
            if !(attr_contains(&anchor, "class", "logo") || attr_contains(&anchor, "class", "brand")) {
                continue;
            }
            for img in anchor.select(&IMG_SELECTOR) {
                if !attr_contains(&img, "alt", "logo") {
                    continue;
                }
                if let Some(src) = image_source(&img) {
                    return Ok(Some(LogoMatch::url(make_absolute_url(base_url, src)?)));
                }
            }
        }
        Ok(None)
    }
}
