//! price-tracker - Resilient listing and price extraction for saved search pages
//!
//! Pages are fetched and rendered elsewhere; this CLI turns their HTML into
//! structured listings.

use anyhow::Result;
use clap::{Parser, Subcommand};
use price_tracker::commands::{CanonicalCommand, ExtractCommand};
use price_tracker::config::{Config, OutputFormat};
use price_tracker::market::Market;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "price-tracker",
    version,
    about = "Extract product listings and prices from rendered search pages",
    long_about = "Extracts titles, prices and links from Amazon and Noon search-result pages \
                  saved as HTML, with fallback selectors and per-page diagnostics."
)]
struct Cli {
    /// Market the page came from (overrides config)
    #[arg(short, long, global = true)]
    market: Option<Market>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract listings from a saved search-results page
    #[command(alias = "x")]
    Extract {
        /// HTML file to read, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Print the diagnostics report after the listings
        #[arg(short, long)]
        diagnostics: bool,

        /// Drop listings without a title
        #[arg(long)]
        skip_untitled: bool,

        /// Smallest plausible price
        #[arg(long)]
        min_price: Option<f64>,

        /// Largest plausible price
        #[arg(long)]
        max_price: Option<f64>,

        /// Keep product links as found instead of canonicalizing them
        #[arg(long)]
        no_canonical: bool,
    },

    /// List supported markets
    Markets,

    /// Print the search URL for a query
    SearchUrl {
        /// Search query
        query: String,
    },

    /// Reduce product URLs to their canonical form
    #[command(alias = "c")]
    Canonical {
        /// Product URL(s)
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(market) = cli.market {
        config.market = market;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Extract {
            input,
            diagnostics,
            skip_untitled,
            min_price,
            max_price,
            no_canonical,
        } => {
            config.diagnostics |= diagnostics;
            config.extract.skip_untitled |= skip_untitled;
            if no_canonical {
                config.extract.canonicalize_links = false;
            }
            if let Some(min) = min_price {
                config.extract.price.min_price = min;
            }
            if let Some(max) = max_price {
                config.extract.price.max_price = max;
            }

            let cmd = ExtractCommand::new(config);
            let output = cmd.execute(&input)?;
            println!("{}", output);
        }

        Commands::Markets => {
            println!("Supported markets:\n");
            println!("{:<10} {:<8} {:<14} {:<32} {:<8}", "Code", "Platform", "Country", "Base URL", "Currency");
            println!("{:-<10} {:-<8} {:-<14} {:-<32} {:-<8}", "", "", "", "", "");

            for market in Market::all() {
                println!(
                    "{:<10} {:<8} {:<14} {:<32} {:<8}",
                    market.to_string(),
                    market.platform().to_string(),
                    market.country(),
                    market.base_url(),
                    market.currency()
                );
            }
        }

        Commands::SearchUrl { query } => {
            if query.trim().is_empty() {
                anyhow::bail!("Search query must not be empty");
            }
            println!("{}", config.market.search_url(&query));
        }

        Commands::Canonical { urls } => {
            let output = if urls.len() == 1 {
                CanonicalCommand.execute(&urls[0])?
            } else {
                CanonicalCommand.execute_batch(&urls)?
            };
            println!("{}", output);
        }
    }

    Ok(())
}
