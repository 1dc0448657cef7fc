//! Product link resolution and canonicalization.
//!
//! Search pages link to products through long SEO paths with tracking query
//! strings. Both storefronts can be reduced to a short canonical form, which
//! makes the same product recognisable across pages and runs.

use tracing::trace;
use url::Url;

/// Adds a `https://` scheme and a `www.` host prefix when missing.
pub fn normalize_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("https://{}", url);
    }

    if !url.contains("://www.") {
        url = url.replacen("://", "://www.", 1);
    }

    url
}

/// Resolves an `href` against the page's base URL.
///
/// Absolute links are returned unchanged. Relative links without a base are
/// returned as-is rather than dropped.
pub fn resolve_link(href: &str, base: Option<&str>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("javascript:") || href == "#" {
        return None;
    }

    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }

    let Some(base) = base else {
        return Some(href.to_string());
    };

    // Url::join drops the last path segment of a base without a trailing slash.
    let base = if base.ends_with('/') { base.to_string() } else { format!("{}/", base) };
    let joined = Url::parse(&base).and_then(|b| b.join(href));

    match joined {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            trace!("Could not resolve link {} against {}: {}", href, base, e);
            Some(href.to_string())
        }
    }
}

/// Reduces a Noon product URL to `https://www.noon.com/{region}/{sku}/p/`.
///
/// Returns `None` if the path has no `p` segment preceded by a region and SKU.
pub fn canonical_noon_url(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let p_index = segments.iter().position(|s| *s == "p")?;
    if p_index < 2 {
        return None;
    }

    let region = segments[0];
    let sku = segments[p_index - 1];
    Some(format!("https://www.noon.com/{}/{}/p/", region, sku))
}

/// Reduces an Amazon product URL to `{scheme}://{host}/dp/{asin}/`.
///
/// Understands both `/dp/{ASIN}` and `/gp/product/{ASIN}` paths.
pub fn canonical_amazon_url(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    let asin = if let Some(i) = segments.iter().position(|s| *s == "dp") {
        segments.get(i + 1)
    } else if segments.contains(&"gp") {
        segments.iter().position(|s| *s == "product").and_then(|i| segments.get(i + 1))
    } else {
        None
    }?;

    let host = url.host_str()?;
    Some(format!("{}://{}/dp/{}/", url.scheme(), host, asin))
}

/// Detects the storefront of a product URL and returns its canonical form.
pub fn canonical_product_url(raw: &str) -> Option<String> {
    let url = Url::parse(&normalize_url(raw)).ok()?;
    let host = url.host_str()?.to_lowercase();

    if host.contains("noon.com") {
        canonical_noon_url(&url)
    } else if host.contains("amazon.") {
        canonical_amazon_url(&url)
    } else {
        trace!("Unsupported store domain: {}", host);
        None
    }
}
