//! Error types for the extraction core.

use thiserror::Error;

/// Errors surfaced by the extraction core.
///
/// Per-listing and per-field misses are never errors; they show up as absent
/// fields and in the diagnostics report. Only page-level unavailability and
/// construction-time configuration problems are reported here.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page content is missing, empty, or has nothing to extract from.
    #[error("page root unavailable: {reason}")]
    RootUnavailable { reason: String },

    #[error("strategy '{strategy}' has an invalid selector \"{selector}\": {reason}")]
    InvalidSelector {
        strategy: String,
        selector: String,
        reason: String,
    },

    #[error("invalid token pattern: {reason}")]
    InvalidPattern { reason: String },

    #[error("invalid price range: min {min} must not exceed max {max}")]
    InvalidPriceRange { min: f64, max: f64 },
}

impl ExtractError {
    pub(crate) fn root_unavailable(reason: impl Into<String>) -> Self {
        Self::RootUnavailable { reason: reason.into() }
    }

    /// True if retrying the page fetch might help.
    pub fn is_page_level(&self) -> bool {
        matches!(self, Self::RootUnavailable { .. })
    }
}
