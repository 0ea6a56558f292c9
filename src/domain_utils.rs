/// Normalize a raw input line into a domain. Only surrounding whitespace is
/// removed; malformed domains flow through and fail at fetch time.
pub fn normalize_domain(raw: &str) -> &str {
    raw.trim()
}

/// Generate the URLs to try for a domain, highest priority first:
/// the root domain, the `about.` subdomain, then the `/about` page.
pub fn generate_domain_urls(domain: &str) -> Vec<String> {
    vec![
        format!("https://{}", domain),
        format!("https://about.{}", domain),
        format!("https://{}/about", domain),
    ]
}

/// URL used by the connectivity precheck
pub fn precheck_url(domain: &str) -> String {
    format!("https://{}", domain)
}
