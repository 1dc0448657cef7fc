//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::locate::StrategySet;
use crate::market::Market;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Market the page was fetched from
    #[serde(default)]
    pub market: Market,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Print the diagnostics report after the listings
    #[serde(default)]
    pub diagnostics: bool,

    /// Extraction settings
    #[serde(default)]
    pub extract: ExtractConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market: Market::default(),
            format: OutputFormat::Table,
            diagnostics: false,
            extract: ExtractConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("price-tracker.toml");
        if local_config.exists() {
            debug!("Found price-tracker.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("price-tracker").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(market) = std::env::var("PT_MARKET") {
            if let Ok(m) = market.parse() {
                self.market = m;
            }
        }

        if let Ok(format) = std::env::var("PT_FORMAT") {
            if let Ok(f) = format.parse() {
                self.format = f;
            }
        }

        if let Ok(min) = std::env::var("PT_MIN_PRICE") {
            if let Ok(v) = min.parse() {
                self.extract.price.min_price = v;
            }
        }

        if let Ok(max) = std::env::var("PT_MAX_PRICE") {
            if let Ok(v) = max.parse() {
                self.extract.price.max_price = v;
            }
        }

        self
    }
}

/// Settings for the extraction core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Token classification and price range
    #[serde(default)]
    pub price: PriceConfig,

    /// Locator strategy chains
    #[serde(default)]
    pub strategies: StrategySet,

    /// Reduce product links to their canonical URL when recognised
    #[serde(default = "default_true")]
    pub canonicalize_links: bool,

    /// Drop listings without a title instead of reporting them as "N/A"
    #[serde(default)]
    pub skip_untitled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            price: PriceConfig::default(),
            strategies: StrategySet::default(),
            canonicalize_links: true,
            skip_untitled: false,
        }
    }
}

/// Phrase lists and price range used by the token classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    /// Smallest plausible amount (inclusive)
    pub min_price: f64,
    /// Largest plausible amount (inclusive)
    pub max_price: f64,
    /// Words that follow a percentage in a discount marker; empty accepts bare "30%"
    pub discount_suffixes: Vec<String>,
    /// Badge phrases treated as ranking metadata
    pub rank_phrases: Vec<String>,
    pub delivery_phrases: Vec<String>,
    pub stock_phrases: Vec<String>,
    /// Currency codes/symbols allowed around an amount
    pub currencies: Vec<String>,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            min_price: 50.0,
            max_price: 1_000_000.0,
            discount_suffixes: strings(&["off"]),
            rank_phrases: strings(&["best seller", "bestseller", "top rated"]),
            delivery_phrases: strings(&[
                "free delivery",
                "fast delivery",
                "express",
                "delivery by",
                "get it by",
                "free shipping",
            ]),
            stock_phrases: strings(&[
                "out of stock",
                "in stock",
                "left",
                "selling out fast",
                "currently unavailable",
            ]),
            currencies: strings(&["SAR", "AED", "EGP", "USD", "$"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.market, Market::NoonSa);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(!config.diagnostics);
        assert!(config.extract.canonicalize_links);
        assert!(!config.extract.skip_untitled);
        assert_eq!(config.extract.price.min_price, 50.0);
        assert_eq!(config.extract.price.max_price, 1_000_000.0);
        assert_eq!(config.extract.strategies, StrategySet::default());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            market = "amazon-ae"
            format = "csv"
            diagnostics = true

            [extract]
            skip_untitled = true

            [extract.price]
            min_price = 5.0
            delivery_phrases = ["express"]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.market, Market::AmazonAe);
        assert_eq!(config.format, OutputFormat::Csv);
        assert!(config.diagnostics);
        assert!(config.extract.skip_untitled);
        assert!(config.extract.canonicalize_links);
        assert_eq!(config.extract.price.min_price, 5.0);
        assert_eq!(config.extract.price.max_price, 1_000_000.0);
        assert_eq!(config.extract.price.delivery_phrases, vec!["express"]);
        assert_eq!(config.extract.price.stock_phrases, PriceConfig::default().stock_phrases);
    }

    #[test]
    fn test_config_strategies_from_toml() {
        let toml = r#"
            [[extract.strategies.container]]
            name = "grid item"
            kind = "css"
            selector = "div.grid > div.item"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        let container = &config.extract.strategies.container;
        assert_eq!(container.len(), 1);
        assert_eq!(container[0].name, "grid item");
        assert_eq!(config.extract.strategies.title, StrategySet::default().title);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            market = "noon-eg"
            format = "json"
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.market, Market::NoonEg);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"market = "amazon-sa""#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.market, Market::AmazonSa);
    }

    #[test]
    fn test_config_with_env() {
        let orig_market = std::env::var("PT_MARKET").ok();
        let orig_min = std::env::var("PT_MIN_PRICE").ok();

        std::env::set_var("PT_MARKET", "amazon-eg");
        std::env::set_var("PT_MIN_PRICE", "1.5");

        let config = Config::new().with_env();
        assert_eq!(config.market, Market::AmazonEg);
        assert_eq!(config.extract.price.min_price, 1.5);

        // Invalid values are ignored
        std::env::set_var("PT_MIN_PRICE", "cheap");
        let config = Config::new().with_env();
        assert_eq!(config.extract.price.min_price, 50.0);

        match orig_market {
            Some(v) => std::env::set_var("PT_MARKET", v),
            None => std::env::remove_var("PT_MARKET"),
        }
        match orig_min {
            Some(v) => std::env::set_var("PT_MIN_PRICE", v),
            None => std::env::remove_var("PT_MIN_PRICE"),
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::new();
        config.market = Market::AmazonAe;
        config.extract.price.max_price = 20_000.0;

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.market, config.market);
        assert_eq!(parsed.extract, config.extract);
    }
}
