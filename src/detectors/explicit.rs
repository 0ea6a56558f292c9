use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{attr_contains, image_source, DetectError, LogoDetector, LogoMatch};
use crate::url_utils::make_absolute_url;

static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid img selector"));

/// First `<img>` whose source, id or class mentions "logo"
pub struct ExplicitLogoDetector;

impl LogoDetector for ExplicitLogoDetector {
    fn name(&self) -> &'static str {
        "explicit_logo"
    }

    fn detect(&self, document: &Html, base_url: &str) -> Result<Option<LogoMatch>, DetectError> {
        for img in document.select(&IMG_SELECTOR) {
            let Some(src) = image_source(&img) else {
                continue;
            };
            let mentions_logo = src.to_lowercase().contains("logo")
                || attr_contains(&img, "id", "logo")
                || attr_contains(&img, "class", "logo");
            if mentions_logo {
                return Ok(Some(LogoMatch::url(make_absolute_url(base_url, src)?)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(html: &str) -> Option<LogoMatch> {
        let document = Html::parse_document(html);
        ExplicitLogoDetector.detect(&document, "https://acme.com/").unwrap()
    }

    #[test]
    fn test_logo_in_source_path() {
        let html = r#"<img src="/img/hero.jpg"><img src="/assets/Acme-LOGO.png">"#;
        assert_eq!(detect(html), Some(LogoMatch::url("https://acme.com/assets/Acme-LOGO.png")));
    }

    #[test]
    fn test_logo_in_id() {
        let html = r#"<img id="logo" src="/a.png">"#;
        assert_eq!(detect(html), Some(LogoMatch::url("https://acme.com/a.png")));
    }

    #[test]
    fn test_logo_in_class() {
        let html = r#"<img class="site-Logo" src="https://img.acme.com/x.webp">"#;
        assert_eq!(detect(html), Some(LogoMatch::url("https://img.acme.com/x.webp")));
    }

    #[test]
    fn test_absolute_source_with_invalid_port_kept_verbatim() {
        let html = r#"<img id="logo" src="https://cdn.acme.com:99999/logo.png">"#;
        assert_eq!(detect(html), Some(LogoMatch::url("https://cdn.acme.com:99999/logo.png")));
    }

    #[test]
    fn test_image_without_source_skipped() {
        let html = r#"<img class="logo"><img src="/other.png">"#;
        assert_eq!(detect(html), None);
    }

    #[test]
    fn test_unrelated_images_ignored() {
        let html = r#"<img src="/team.jpg" alt="logo of our team" class="photo">"#;
        assert_eq!(detect(html), None);
    }
}
