//! Extract command implementation.

use crate::config::{Config, OutputFormat};
use crate::diagnostics::Verdict;
use crate::extract::{Extraction, ListingExtractor};
use crate::format::Formatter;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extracts listings from a saved search-results page.
pub struct ExtractCommand {
    config: Config,
}

impl ExtractCommand {
    /// Creates a new extract command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads the page from `source` ("-" for stdin) and returns formatted output.
    pub fn execute(&self, source: &str) -> Result<String> {
        let html = read_page(source)?;
        self.execute_html(&html)
    }

    /// Extracts from page HTML already in memory.
    pub fn execute_html(&self, html: &str) -> Result<String> {
        let extraction = self.extract(html)?;

        let formatter = Formatter::new(self.config.format).with_market(self.config.market);

        if !self.config.diagnostics {
            return Ok(formatter.format_listings(&extraction.listings));
        }

        if self.config.format == OutputFormat::Json {
            let combined = serde_json::json!({
                "listings": extraction.listings,
                "diagnostics": extraction.diagnostics,
            });
            return serde_json::to_string_pretty(&combined)
                .context("Failed to serialize extraction");
        }

        Ok(format!(
            "{}\n\n{}",
            formatter.format_listings(&extraction.listings),
            formatter.format_diagnostics(&extraction.diagnostics)
        ))
    }

    /// Runs the extractor with the configured market and settings.
    pub fn extract(&self, html: &str) -> Result<Extraction> {
        info!("Extracting listings for {}", self.config.market);

        let extractor = ListingExtractor::for_market(&self.config.extract, self.config.market)
            .context("Invalid extraction configuration")?;
        let extraction = extractor.extract_html(html).context("Could not extract listings")?;

        match extraction.diagnostics.verdict() {
            Verdict::NoContainers | Verdict::PricesMissing => {
                warn!("{} (run with --diagnostics for details)", extraction.diagnostics.verdict())
            }
            verdict => debug!("Page verdict: {}", verdict),
        }

        info!("Found {} listings", extraction.len());
        Ok(extraction)
    }
}

/// Reads page HTML from a file, or from stdin when `source` is "-".
pub fn read_page(source: &str) -> Result<String> {
    if source == "-" {
        debug!("Reading page from stdin");
        let mut html = String::new();
        std::io::stdin().read_to_string(&mut html).context("Failed to read page from stdin")?;
        return Ok(html);
    }

    let path = Path::new(source);
    debug!("Reading page from: {}", path.display());
    std::fs::read_to_string(path).with_context(|| format!("Failed to read page: {}", path.display()))
}
