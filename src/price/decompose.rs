//! Decomposition of a listing's price text into structured fields.
//!
//! **Ordering policy**: the first in-range amount is taken as the current
//! price. Search pages in the supported markets render the sale price before
//! the strikethrough price, so this holds for them; a new market must be
//! checked against real samples before reusing it.

use crate::config::PriceConfig;
use crate::error::ExtractError;
use crate::price::classify::Classifier;
use crate::price::models::{derive_discount, PriceToken, StructuredPrice, TokenKind};
use serde::{Deserialize, Serialize};

/// A price text that needed the deterministic policy to resolve.
///
/// Notes are informational; they never change the decomposed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceAmbiguity {
    /// More than two in-range amounts; only the first two candidates were considered.
    ExtraAmounts { count: usize },
    /// Several amounts, none greater than the first, so no original price.
    NoGreaterOriginal,
    /// The page's discount marker disagrees with the two prices by more than a point.
    DiscountMismatch { explicit: u8, derived: u8 },
}

/// Full decomposition output, including the classified tokens.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub price: StructuredPrice,
    pub tokens: Vec<PriceToken>,
    pub ambiguities: Vec<PriceAmbiguity>,
}

/// Turns ordered price lines into a [`StructuredPrice`].
#[derive(Debug, Clone)]
pub struct Decomposer {
    classifier: Classifier,
}

impl Decomposer {
    pub fn new(config: &PriceConfig) -> Result<Self, ExtractError> {
        Ok(Self { classifier: Classifier::new(config)? })
    }

    /// Decomposes price lines into current/original/discount.
    pub fn decompose<S: AsRef<str>>(&self, lines: &[S]) -> StructuredPrice {
        self.decompose_detailed(lines).price
    }

    /// Like [`decompose`](Self::decompose), also returning tokens and ambiguity notes.
    pub fn decompose_detailed<S: AsRef<str>>(&self, lines: &[S]) -> Decomposition {
        let tokens: Vec<PriceToken> =
            lines.iter().map(|line| self.classifier.classify(line.as_ref())).collect();
        let raw = lines.iter().map(|line| line.as_ref()).collect::<Vec<&str>>().join("\n");

        let amounts: Vec<f64> = tokens.iter().filter_map(PriceToken::amount).collect();
        let mut ambiguities = Vec::new();

        let (current, original) = match amounts.as_slice() {
            [] => (None, None),
            [only] => (Some(*only), None),
            [first, rest @ ..] => {
                let original = rest.iter().copied().find(|a| *a > *first);
                if original.is_none() {
                    ambiguities.push(PriceAmbiguity::NoGreaterOriginal);
                }
                if amounts.len() > 2 {
                    ambiguities.push(PriceAmbiguity::ExtraAmounts { count: amounts.len() });
                }
                (Some(*first), original)
            }
        };

        let explicit = tokens
            .iter()
            .find(|t| t.kind == TokenKind::DiscountPercent)
            .and_then(PriceToken::discount);
        let derived = match (current, original) {
            (Some(c), Some(o)) => derive_discount(c, o),
            _ => None,
        };

        if let (Some(explicit), Some(derived)) = (explicit, derived) {
            if explicit.abs_diff(derived) > 1 {
                ambiguities.push(PriceAmbiguity::DiscountMismatch { explicit, derived });
            }
        }

        Decomposition {
            price: StructuredPrice {
                current,
                original,
                discount_percent: explicit.or(derived),
                raw,
            },
            tokens,
            ambiguities,
        }
    }
}
