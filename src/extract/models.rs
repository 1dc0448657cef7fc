//! Listing data models.

use crate::price::StructuredPrice;
use serde::{Deserialize, Serialize};

/// Title reported for listings whose title could not be located.
pub const MISSING_TITLE: &str = "N/A";

/// Raw text read from one container before decomposition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListingBlock {
    pub title_text: Option<String>,
    /// Text lines of the price block, in document order
    pub price_text: Vec<String>,
    /// `href` as found in the page, before resolution
    pub link_url: Option<String>,
}

impl RawListingBlock {
    pub fn is_empty(&self) -> bool {
        self.title_text.is_none() && self.price_text.is_empty() && self.link_url.is_none()
    }
}

/// One product listing as emitted to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Product title, or "N/A" when no title was located
    pub title: String,
    pub price: StructuredPrice,
    pub link: Option<String>,
}

impl ListingRecord {
    pub fn has_title(&self) -> bool {
        self.title != MISSING_TITLE
    }
}

/// Formats an amount with thousands separators, keeping up to two decimals.
pub fn format_amount(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = (cents % 100).abs();

    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        grouped.insert(0, '-');
    }

    if frac == 0 {
        grouped
    } else {
        format!("{}.{:02}", grouped, frac)
    }
}
