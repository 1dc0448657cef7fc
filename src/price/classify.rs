//! Classification of single price-area lines into tokens.

use crate::config::PriceConfig;
use crate::error::ExtractError;
use crate::price::models::{PriceToken, TokenKind};
use regex_lite::Regex;

/// Classifies one line of price text.
///
/// Built once from [`PriceConfig`]; classification itself is pure and total.
/// Priority, first match wins: discount, rank, delivery, stock, amount.
/// A bare "in <Category>" line only counts as a rank once the delivery and
/// stock phrases have not matched.
#[derive(Debug, Clone)]
pub struct Classifier {
    discount: Regex,
    rank: Regex,
    category: Regex,
    amount: Regex,
    rank_phrases: Vec<String>,
    delivery_phrases: Vec<String>,
    stock_phrases: Vec<String>,
    min_price: f64,
    max_price: f64,
}

impl Classifier {
    /// Builds a classifier from phrase lists and the plausible price range.
    pub fn new(config: &PriceConfig) -> Result<Self, ExtractError> {
        let (min, max) = (config.min_price, config.max_price);
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ExtractError::InvalidPriceRange { min, max });
        }

        Ok(Self {
            discount: compile(&discount_pattern(&config.discount_suffixes))?,
            rank: compile(r"^#\s*\d+")?,
            category: compile(r"\bin\s+[A-Z]")?,
            amount: compile(&amount_pattern(&config.currencies))?,
            rank_phrases: lowercase_all(&config.rank_phrases),
            delivery_phrases: lowercase_all(&config.delivery_phrases),
            stock_phrases: lowercase_all(&config.stock_phrases),
            min_price: min,
            max_price: max,
        })
    }

    /// Classifies a single line.
    pub fn classify(&self, line: &str) -> PriceToken {
        let text = line.trim();
        if text.is_empty() {
            return PriceToken::unknown(line);
        }

        if let Some(pct) = self.match_discount(text) {
            return PriceToken::new(line, TokenKind::DiscountPercent, Some(f64::from(pct)));
        }

        if self.is_rank(text) {
            return PriceToken::new(line, TokenKind::Rank, None);
        }

        let lower = text.to_lowercase();
        if contains_any(&lower, &self.delivery_phrases) {
            return PriceToken::new(line, TokenKind::Delivery, None);
        }
        if contains_any(&lower, &self.stock_phrases) {
            return PriceToken::new(line, TokenKind::Stock, None);
        }

        // "in <Category>" without a leading "#": weaker than a delivery or stock phrase
        if self.category.is_match(text) {
            return PriceToken::new(line, TokenKind::Rank, None);
        }

        match self.parse_amount(text) {
            Some(value) if self.in_range(value) => {
                PriceToken::new(line, TokenKind::Amount, Some(value))
            }
            _ => PriceToken::unknown(line),
        }
    }

    /// Returns true if `value` lies within the plausible price range.
    pub fn in_range(&self, value: f64) -> bool {
        value >= self.min_price && value <= self.max_price
    }

    fn match_discount(&self, text: &str) -> Option<u8> {
        let caps = self.discount.captures(text)?;
        let pct: u32 = caps.get(1)?.as_str().parse().ok()?;
        u8::try_from(pct).ok().filter(|p| *p <= 100)
    }

    fn is_rank(&self, text: &str) -> bool {
        if self.rank.is_match(text) {
            return true;
        }
        let lower = text.to_lowercase();
        contains_any(&lower, &self.rank_phrases)
    }

    /// Parses "4,099", "1,299." or "SAR 89.50" into a number.
    fn parse_amount(&self, text: &str) -> Option<f64> {
        let caps = self.amount.captures(text)?;
        let whole = caps.name("whole")?.as_str().replace(',', "");
        let number = match caps.name("frac").map(|m| m.as_str()) {
            Some(frac) if !frac.is_empty() => format!("{}.{}", whole, frac),
            _ => whole,
        };
        number.parse().ok()
    }
}

fn compile(pattern: &str) -> Result<Regex, ExtractError> {
    Regex::new(pattern).map_err(|e| ExtractError::InvalidPattern { reason: e.to_string() })
}

/// An empty suffix list accepts a bare percentage such as "-30%".
fn discount_pattern(suffixes: &[String]) -> String {
    let suffixes = alternation(suffixes);
    if suffixes.is_empty() {
        r"(?i)-?\s*(\d{1,3})\s*%".to_string()
    } else {
        format!(r"(?i)-?\s*(\d{{1,3}})\s*%\s*(?:{})", suffixes)
    }
}

fn amount_pattern(currencies: &[String]) -> String {
    let number = r"(?P<whole>\d{1,3}(?:,\d{3})+|\d+)(?:\.(?P<frac>\d*))?";
    let currencies = alternation(currencies);
    if currencies.is_empty() {
        format!(r"^{}$", number)
    } else {
        format!(r"(?i)^(?:(?:{c})\s*)?{n}(?:\s*(?:{c}))?$", c = currencies, n = number)
    }
}

fn alternation(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(regex_lite::escape)
        .collect::<Vec<_>>()
        .join("|")
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()).collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}
