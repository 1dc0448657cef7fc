//! Canonical product URL command implementation.

use crate::urls::canonical_product_url;
use anyhow::Result;
use tracing::info;

/// Reduces product URLs to their canonical form.
pub struct CanonicalCommand;

impl CanonicalCommand {
    /// Returns the canonical form of a single product URL.
    pub fn execute(&self, url: &str) -> Result<String> {
        let url = url.trim();
        if url.is_empty() {
            anyhow::bail!("No URL given");
        }

        info!("Canonicalizing: {}", url);

        canonical_product_url(url).ok_or_else(|| {
            anyhow::anyhow!(
                "Not a recognised product URL: '{}'. Expected an Amazon /dp/ or /gp/product/ link, \
                or a Noon link ending in /{{sku}}/p/.",
                url
            )
        })
    }

    /// Canonicalizes several URLs, one result per line.
    ///
    /// Unrecognised URLs are reported inline instead of failing the batch.
    pub fn execute_batch(&self, urls: &[String]) -> Result<String> {
        if urls.is_empty() {
            anyhow::bail!("No URLs given");
        }

        let lines: Vec<String> = urls
            .iter()
            .map(|url| match self.execute(url) {
                Ok(canonical) => canonical,
                Err(e) => format!("error: {}", e),
            })
            .collect();

        Ok(lines.join("\n"))
    }
}
