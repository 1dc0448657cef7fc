//! Listing extraction from rendered search-result pages.

pub mod models;

pub use models::{ListingRecord, RawListingBlock, MISSING_TITLE};

use crate::config::ExtractConfig;
use crate::diagnostics::{DiagnosticsReport, ListingOutcome};
use crate::error::ExtractError;
use crate::locate::{LocateTrail, Locator, Target};
use crate::market::Market;
use crate::price::{Decomposer, StructuredPrice};
use crate::urls::{canonical_product_url, resolve_link};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, trace, warn};

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

/// Listings and diagnostics for one page.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub listings: Vec<ListingRecord>,
    pub diagnostics: DiagnosticsReport,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }
}

/// Extracts structured listings from a page.
///
/// Immutable once built; one extractor can serve many pages, including from
/// several threads.
pub struct ListingExtractor {
    locator: Locator,
    decomposer: Decomposer,
    link_base: Option<String>,
    canonicalize_links: bool,
    skip_untitled: bool,
}

impl ListingExtractor {
    /// Builds an extractor from configuration, compiling every strategy.
    pub fn new(config: &ExtractConfig) -> Result<Self, ExtractError> {
        let extractor = Self {
            locator: Locator::from_strategies(&config.strategies)?,
            decomposer: Decomposer::new(&config.price)?,
            link_base: None,
            canonicalize_links: config.canonicalize_links,
            skip_untitled: config.skip_untitled,
        };
        Ok(extractor)
    }

    /// Builds an extractor that resolves relative links against `market`'s base URL.
    pub fn for_market(config: &ExtractConfig, market: Market) -> Result<Self, ExtractError> {
        Ok(Self::new(config)?.with_link_base(market.base_url()))
    }

    pub fn with_link_base(mut self, base: impl Into<String>) -> Self {
        self.link_base = Some(base.into());
        self
    }

    pub fn canonicalize_links(mut self, enabled: bool) -> Self {
        self.canonicalize_links = enabled;
        self
    }

    pub fn skip_untitled(mut self, enabled: bool) -> Self {
        self.skip_untitled = enabled;
        self
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Parses `html` and extracts every listing from it.
    pub fn extract_html(&self, html: &str) -> Result<Extraction, ExtractError> {
        if html.trim().is_empty() {
            return Err(ExtractError::root_unavailable("page content is empty"));
        }

        let document = Html::parse_document(html);
        self.extract_document(&document)
    }

    /// Extracts every listing from a parsed document.
    pub fn extract_document(&self, document: &Html) -> Result<Extraction, ExtractError> {
        let body = document
            .select(&BODY)
            .next()
            .ok_or_else(|| ExtractError::root_unavailable("document has no body"))?;

        if !body.children().any(|child| child.value().is_element()) {
            return Err(ExtractError::root_unavailable("page body is empty"));
        }

        self.extract_all(Some(document.root_element()))
    }

    /// Extracts every listing below `root`.
    ///
    /// Missing fields never fail a listing; they are reported as absent and
    /// recorded in the diagnostics. Only a missing root is an error.
    pub fn extract_all(&self, root: Option<ElementRef<'_>>) -> Result<Extraction, ExtractError> {
        let root = root.ok_or_else(|| ExtractError::root_unavailable("no page root supplied"))?;

        let containers = self.locator.locate(root, Target::Container);
        if containers.is_empty() {
            warn!(
                "No listing containers found ({} strategies tried)",
                containers.trail.attempts.len()
            );
        } else {
            debug!(
                "Found {} listing containers via '{}'",
                containers.matches.len(),
                containers.trail.winner_name().unwrap_or_default()
            );
        }

        let mut listings = Vec::with_capacity(containers.matches.len());
        let mut outcomes = Vec::with_capacity(containers.matches.len());

        for (index, container) in containers.matches.iter().enumerate() {
            let (record, mut outcome) = self.extract_listing(index, container.element);

            if self.skip_untitled && !record.has_title() {
                trace!("Skipping untitled listing #{}", index + 1);
                outcome.skipped = true;
            } else {
                listings.push(record);
            }
            outcomes.push(outcome);
        }

        debug!("Extracted {} listings", listings.len());

        Ok(Extraction {
            listings,
            diagnostics: DiagnosticsReport::from_outcomes(containers.trail, outcomes),
        })
    }

    /// Reads one container's title, price block and link, all scoped to it.
    pub fn read_block(&self, container: ElementRef<'_>) -> RawListingBlock {
        self.read_block_traced(container).0
    }

    fn read_block_traced(
        &self,
        container: ElementRef<'_>,
    ) -> (RawListingBlock, [LocateTrail; 3]) {
        let title = self.locator.locate(container, Target::Title);
        let price = self.locator.locate(container, Target::PriceBlock);
        let link = self.locator.locate(container, Target::Link);

        let block = RawListingBlock {
            title_text: title.first().map(|m| m.lines().join(" ")),
            price_text: price.first().map(|m| m.lines()).unwrap_or_default(),
            link_url: link.first().map(|m| m.value.clone()),
        };

        (block, [title.trail, price.trail, link.trail])
    }

    fn extract_listing(&self, index: usize, container: ElementRef<'_>) -> (ListingRecord, ListingOutcome) {
        let (block, [title_trail, price_trail, link_trail]) = self.read_block_traced(container);

        if block.is_empty() {
            debug!("Listing #{}: container yielded no title, price or link", index + 1);
        } else {
            for trail in [&title_trail, &price_trail, &link_trail] {
                if trail.is_miss() {
                    trace!("Listing #{}: no {} found", index + 1, trail.target);
                }
            }
        }

        let decomposition = if block.price_text.is_empty() {
            None
        } else {
            Some(self.decomposer.decompose_detailed(&block.price_text))
        };
        let (price, ambiguities) = match decomposition {
            Some(d) => (d.price, d.ambiguities),
            None => (StructuredPrice::empty(), Vec::new()),
        };

        let record = ListingRecord {
            title: block.title_text.unwrap_or_else(|| MISSING_TITLE.to_string()),
            link: block.link_url.as_deref().and_then(|href| self.finish_link(href)),
            price,
        };

        let outcome = ListingOutcome {
            index,
            title: title_trail,
            price_block: price_trail,
            link: link_trail,
            price_parsed: record.price.current.is_some(),
            ambiguities,
            skipped: false,
        };

        (record, outcome)
    }

    fn finish_link(&self, href: &str) -> Option<String> {
        let resolved = resolve_link(href, self.link_base.as_deref())?;
        if !self.canonicalize_links || !resolved.starts_with("http") {
            return Some(resolved);
        }

        Some(canonical_product_url(&resolved).unwrap_or(resolved))
    }
}
