//! CLI command implementations.

pub mod canonical;
pub mod extract;

pub use canonical::CanonicalCommand;
pub use extract::ExtractCommand;
