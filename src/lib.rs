//! price-tracker - Resilient listing and price extraction for rendered
//! e-commerce search pages.
//!
//! The core takes page HTML that was fetched and rendered elsewhere and
//! returns one record per listing: title, a structured price (current,
//! original, discount) and a product link. Every DOM lookup goes through an
//! ordered chain of strategies, so a markup change degrades individual
//! fields instead of failing the page, and the diagnostics report shows
//! which strategy fired for what.
//!
//! ```no_run
//! use price_tracker::{ExtractConfig, ListingExtractor, Market};
//!
//! # fn main() -> Result<(), price_tracker::ExtractError> {
//! let html = std::fs::read_to_string("page.html").unwrap_or_default();
//! let extractor = ListingExtractor::for_market(&ExtractConfig::default(), Market::NoonSa)?;
//! let extraction = extractor.extract_html(&html)?;
//! for listing in &extraction.listings {
//!     println!("{} {:?}", listing.title, listing.price.current);
//! }
//! println!("{}", extraction.diagnostics.verdict());
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod format;
pub mod locate;
pub mod market;
pub mod price;
pub mod urls;

pub use config::{Config, ExtractConfig, PriceConfig};
pub use diagnostics::{DiagnosticsReport, Verdict};
pub use error::ExtractError;
pub use extract::{Extraction, ListingExtractor, ListingRecord};
pub use locate::{Locator, LocatorBuilder, Strategy, Target};
pub use market::Market;
pub use price::{Decomposer, StructuredPrice};
