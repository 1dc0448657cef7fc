//! Default locator strategies for the supported storefronts.
//!
//! Update these chains when a storefront changes its markup. Attribute
//! matches come first because `data-*` attributes outlive class renames;
//! structural heuristics come last.
//!
//! **Update process**: when a page yields no containers or no prices, save
//! the rendered HTML, run `price-tracker extract --diagnostics` on it, adjust
//! the chain, and add the page as a test fixture.

use crate::locate::strategy::LocatorStrategy;
use crate::locate::Target;
use serde::{Deserialize, Serialize};

/// Ordered strategy chains for every locator target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySet {
    pub container: Vec<LocatorStrategy>,
    pub title: Vec<LocatorStrategy>,
    pub price_block: Vec<LocatorStrategy>,
    pub link: Vec<LocatorStrategy>,
}

impl StrategySet {
    /// Returns the configured chain for `target`.
    pub fn chain(&self, target: Target) -> &[LocatorStrategy] {
        match target {
            Target::Container => &self.container,
            Target::Title => &self.title,
            Target::PriceBlock => &self.price_block,
            Target::Link => &self.link,
        }
    }
}

impl Default for StrategySet {
    fn default() -> Self {
        Self {
            container: container(),
            title: title(),
            price_block: price_block(),
            link: link(),
        }
    }
}

/// Search-result cards.
pub fn container() -> Vec<LocatorStrategy> {
    vec![
        LocatorStrategy::css("amazon search result", "[data-component-type='s-search-result']"),
        LocatorStrategy::css("noon product box", "[data-qa='plp-product-box']"),
        LocatorStrategy::css("product class", "div[class*='product']"),
        LocatorStrategy::css("article tag", "article"),
        LocatorStrategy::css("data-qa product", "div[data-qa*='product']"),
    ]
}

/// Product title inside a card.
pub fn title() -> Vec<LocatorStrategy> {
    vec![
        LocatorStrategy::css("h2 heading", "h2"),
        LocatorStrategy::css("h3 heading", "h3"),
        LocatorStrategy::css("s-title span", "span[data-component-type='s-title']"),
        LocatorStrategy::own_text_length("long text", "*", 10),
    ]
}

/// Price area inside a card; its text lines feed the decomposer.
pub fn price_block() -> Vec<LocatorStrategy> {
    vec![
        LocatorStrategy::css("a-price-whole", ".a-price-whole"),
        LocatorStrategy::css("price class", "[class*='price']"),
        LocatorStrategy::scope_attr("data-price attribute", "data-price"),
        LocatorStrategy::own_text_contains("currency indicator", "*", &["SAR", "AED", "EGP"]),
    ]
}

/// Anchors that can lead somewhere; `#` and `javascript:` hrefs are placeholders.
const NAVIGABLE_LINK: &str = "a[href]:not([href='#']):not([href^='javascript:'])";

/// Product link inside a card.
pub fn link() -> Vec<LocatorStrategy> {
    vec![
        LocatorStrategy::css("h2 link", format!("h2 {}", NAVIGABLE_LINK)).with_value_attr("href"),
        LocatorStrategy::css("h3 link", format!("h3 {}", NAVIGABLE_LINK)).with_value_attr("href"),
        LocatorStrategy::css("any link", NAVIGABLE_LINK).with_value_attr("href"),
    ]
}
