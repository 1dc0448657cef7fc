//! Data models for classified price fragments and decomposed prices.

use serde::{Deserialize, Serialize};

/// What a single line of price-area text represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// A currency amount inside the plausible price range.
    Amount,
    /// A discount marker such as "30% OFF".
    DiscountPercent,
    /// A ranking badge such as "#2 in Notebook Laptops".
    Rank,
    /// A delivery tag such as "Free Delivery".
    Delivery,
    /// A stock marker such as "Only 2 left in stock".
    Stock,
    Unknown,
}

/// One classified line of price-area text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceToken {
    /// The line as it was classified
    pub raw: String,
    pub kind: TokenKind,
    /// Parsed amount or discount percentage, when the kind carries one
    pub numeric_value: Option<f64>,
}

impl PriceToken {
    pub fn new(raw: impl Into<String>, kind: TokenKind, numeric_value: Option<f64>) -> Self {
        Self { raw: raw.into(), kind, numeric_value }
    }

    pub fn unknown(raw: impl Into<String>) -> Self {
        Self::new(raw, TokenKind::Unknown, None)
    }

    /// Returns the amount if this is an in-range currency amount.
    pub fn amount(&self) -> Option<f64> {
        match self.kind {
            TokenKind::Amount => self.numeric_value,
            _ => None,
        }
    }

    /// Returns the percentage if this is a discount marker.
    pub fn discount(&self) -> Option<u8> {
        match self.kind {
            TokenKind::DiscountPercent => self.numeric_value.map(|v| v as u8),
            _ => None,
        }
    }
}

/// Price fields decomposed from one listing's price text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPrice {
    /// Price the customer pays now (post-discount)
    pub current: Option<f64>,
    /// Pre-discount reference price; always greater than `current` when both are set
    pub original: Option<f64>,
    /// Discount percentage, explicit from the page or derived from the two prices
    pub discount_percent: Option<u8>,
    /// Input lines joined with line breaks, kept verbatim for auditing
    pub raw: String,
}

impl StructuredPrice {
    /// A price with every field absent.
    pub fn empty() -> Self {
        Self { current: None, original: None, discount_percent: None, raw: String::new() }
    }

    /// True if a current price was found.
    pub fn has_price(&self) -> bool {
        self.current.is_some()
    }

}

impl Default for StructuredPrice {
    fn default() -> Self {
        Self::empty()
    }
}

/// `round((original - current) / original * 100)`, limited to 0..=100.
pub(crate) fn derive_discount(current: f64, original: f64) -> Option<u8> {
    if original <= 0.0 {
        return None;
    }
    let pct = ((original - current) / original * 100.0).round();
    Some(pct.clamp(0.0, 100.0) as u8)
}
