//! Error types for token definitions and registry lookups

use thiserror::Error;

/// Errors raised while building or querying a token registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Symbol is not present in the registry
    #[error("Unknown token symbol '{symbol}'")]
    UnknownToken { symbol: String },

    /// Symbol was registered twice
    #[error("Token '{symbol}' is already registered")]
    DuplicateToken { symbol: String },

    /// Decimals exceed what a `Decimal` amount can carry
    #[error("Token '{symbol}' has {decimals} decimals, maximum supported is {max}")]
    InvalidDecimals { symbol: String, decimals: u8, max: u8 },

    /// Symbol is empty or whitespace
    #[error("Token symbol cannot be empty")]
    EmptySymbol,
}
