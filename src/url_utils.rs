//! Logo URL absolutization
//!
//! Every detector that reads a URL out of markup passes it through
//! [`make_absolute_url`] so the report only ever contains absolute URLs.

use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UrlError {
    #[error("cannot resolve '{candidate}' against base '{base}': {source}")]
    Join {
        base: String,
        candidate: String,
        #[source]
        source: url::ParseError,
    },
}

/// Ensures a logo URL is absolute.
///
/// - empty input is returned unchanged
/// - protocol-relative `//host/path` gets an `https:` prefix
/// - URLs without a network location are resolved against `base_url`
/// - URLs with a network location are returned unchanged
///
/// Absolutizing an already-absolute URL is a no-op.
pub fn make_absolute_url(base_url: &str, logo_url: &str) -> Result<String, UrlError> {
    if logo_url.is_empty() {
        return Ok(String::new());
    }

    if logo_url.starts_with("//") {
        return Ok(format!("https:{}", logo_url));
    }

    if has_network_location(logo_url) {
        return Ok(logo_url.to_string());
    }

    let join_error = |source| UrlError::Join {
        base: base_url.to_string(),
        candidate: logo_url.to_string(),
        source,
    };
    let base = Url::parse(base_url).map_err(join_error)?;
    let joined = base.join(logo_url).map_err(join_error)?;
    Ok(joined.to_string())
}

/// True when the URL carries `scheme://authority` with a non-empty authority.
///
/// Purely syntactic: the host and port are not validated, so a URL the `url`
/// crate would reject is still recognised as absolute.
fn has_network_location(candidate: &str) -> bool {
    let Some((scheme, rest)) = candidate.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    is_scheme(scheme) && !authority.is_empty()
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// True when the URL parses with an `http` or `https` scheme.
pub fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
