//! Price text classification and decomposition.

pub mod classify;
pub mod decompose;
pub mod models;

pub use classify::Classifier;
pub use decompose::{Decomposer, Decomposition, PriceAmbiguity};
pub use models::{PriceToken, StructuredPrice, TokenKind};
