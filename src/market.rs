//! Supported marketplaces: base URLs, currencies and search URLs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storefront platform a market belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Noon,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Amazon => write!(f, "Amazon"),
            Platform::Noon => write!(f, "Noon"),
        }
    }
}

/// A platform + country pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Market {
    #[serde(rename = "amazon-sa")]
    AmazonSa,
    #[serde(rename = "amazon-ae")]
    AmazonAe,
    #[serde(rename = "amazon-eg")]
    AmazonEg,
    #[default]
    #[serde(rename = "noon-sa")]
    NoonSa,
    #[serde(rename = "noon-ae")]
    NoonAe,
    #[serde(rename = "noon-eg")]
    NoonEg,
}

impl Market {
    pub fn platform(&self) -> Platform {
        match self {
            Market::AmazonSa | Market::AmazonAe | Market::AmazonEg => Platform::Amazon,
            Market::NoonSa | Market::NoonAe | Market::NoonEg => Platform::Noon,
        }
    }

    /// Human-readable country name.
    pub fn country(&self) -> &'static str {
        match self {
            Market::AmazonSa | Market::NoonSa => "Saudi Arabia",
            Market::AmazonAe | Market::NoonAe => "UAE",
            Market::AmazonEg | Market::NoonEg => "Egypt",
        }
    }

    /// Base URL that relative product links are resolved against.
    pub fn base_url(&self) -> &'static str {
        match self {
            Market::AmazonSa => "https://www.amazon.sa",
            Market::AmazonAe => "https://www.amazon.ae",
            Market::AmazonEg => "https://www.amazon.eg",
            Market::NoonSa => "https://www.noon.com/saudi-en",
            Market::NoonAe => "https://www.noon.com/uae-en",
            Market::NoonEg => "https://www.noon.com/egypt-en",
        }
    }

    /// ISO currency code prices are displayed in.
    pub fn currency(&self) -> &'static str {
        match self {
            Market::AmazonSa | Market::NoonSa => "SAR",
            Market::AmazonAe | Market::NoonAe => "AED",
            Market::AmazonEg | Market::NoonEg => "EGP",
        }
    }

    /// Builds the search-results URL the page fetcher should load.
    pub fn search_url(&self, query: &str) -> String {
        let query = urlencoding::encode(query.trim());
        match self.platform() {
            Platform::Amazon => format!("{}/s?k={}", self.base_url(), query),
            Platform::Noon => format!("{}/search?q={}", self.base_url(), query),
        }
    }

    pub fn all() -> &'static [Market] {
        &[
            Market::AmazonSa,
            Market::AmazonAe,
            Market::AmazonEg,
            Market::NoonSa,
            Market::NoonAe,
            Market::NoonEg,
        ]
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Market::AmazonSa => "amazon-sa",
            Market::AmazonAe => "amazon-ae",
            Market::AmazonEg => "amazon-eg",
            Market::NoonSa => "noon-sa",
            Market::NoonAe => "noon-ae",
            Market::NoonEg => "noon-eg",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Market {
    type Err = MarketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "amazon-sa" | "amazon-saudi-arabia" => Ok(Market::AmazonSa),
            "amazon-ae" | "amazon-uae" => Ok(Market::AmazonAe),
            "amazon-eg" | "amazon-egypt" => Ok(Market::AmazonEg),
            "noon-sa" | "noon-saudi-arabia" | "noon" => Ok(Market::NoonSa),
            "noon-ae" | "noon-uae" => Ok(Market::NoonAe),
            "noon-eg" | "noon-egypt" => Ok(Market::NoonEg),
            _ => Err(MarketParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketParseError(String);

impl fmt::Display for MarketParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown market '{}'. Valid markets: amazon-sa, amazon-ae, amazon-eg, noon-sa, noon-ae, noon-eg",
            self.0
        )
    }
}

impl std::error::Error for MarketParseError {}
