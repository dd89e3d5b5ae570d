//! Token definitions and the symbol lookup table
//!
//! ## Precision by Token
//!
//! - **USDC / USDT**: 6 decimal places
//! - **WBTC**: 8 decimal places
//! - **WETH / DAI / ARB**: 18 decimal places
//!
//! Simulated amounts are `f64`; [`Token::truncate_amount`] is the single
//! conversion point back to a fixed-precision [`Decimal`] for display.

use std::collections::BTreeMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::TypesError;

/// Largest scale a `Decimal` can represent
pub const MAX_TOKEN_DECIMALS: u8 = 28;

/// An ERC-20 style token known to the quoting layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

impl Token {
    /// Create a token, rejecting empty symbols and unsupported precision
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
    ) -> Result<Self, TypesError> {
        let token = Self {
            symbol: symbol.into(),
            name: name.into(),
            decimals,
        };
        token.validate()?;
        Ok(token)
    }

    /// Check the invariants `new` enforces (deserialized tokens skip `new`)
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.symbol.trim().is_empty() {
            return Err(TypesError::EmptySymbol);
        }
        if self.decimals > MAX_TOKEN_DECIMALS {
            return Err(TypesError::InvalidDecimals {
                symbol: self.symbol.clone(),
                decimals: self.decimals,
                max: MAX_TOKEN_DECIMALS,
            });
        }
        Ok(())
    }

    /// Convert a simulated amount to this token's precision, rounding toward zero
    ///
    /// Returns `None` for NaN, infinities and magnitudes beyond `Decimal` range.
    pub fn truncate_amount(&self, amount: f64) -> Option<Decimal> {
        let value = Decimal::from_f64(amount)?;
        Some(value.round_dp_with_strategy(u32::from(self.decimals), RoundingStrategy::ToZero))
    }

    /// Case-insensitive symbol comparison
    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol.trim())
    }

    fn key(symbol: &str) -> String {
        symbol.trim().to_ascii_uppercase()
    }
}

/// Symbol → token lookup table
///
/// Built explicitly and handed to whoever needs it. Lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenRegistry {
    tokens: BTreeMap<String, Token>,
}

impl TokenRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the tokens the terminal lists by default
    pub fn with_defaults() -> Self {
        let defaults = [
            ("USDC", "USD Coin", 6),
            ("USDT", "Tether USD", 6),
            ("DAI", "Dai Stablecoin", 18),
            ("WETH", "Wrapped Ether", 18),
            ("WBTC", "Wrapped Bitcoin", 8),
            ("ARB", "Arbitrum", 18),
        ];

        let tokens = defaults
            .into_iter()
            .map(|(symbol, name, decimals)| {
                (
                    Token::key(symbol),
                    Token {
                        symbol: symbol.to_string(),
                        name: name.to_string(),
                        decimals,
                    },
                )
            })
            .collect();

        Self { tokens }
    }

    /// Add a token; a symbol can only be registered once
    pub fn register(&mut self, token: Token) -> Result<(), TypesError> {
        token.validate()?;
        let key = Token::key(&token.symbol);
        if self.tokens.contains_key(&key) {
            return Err(TypesError::DuplicateToken {
                symbol: token.symbol,
            });
        }
        self.tokens.insert(key, token);
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&Token> {
        self.tokens.get(&Token::key(symbol))
    }

    /// Like [`get`](Self::get) but reports unknown symbols as an error
    pub fn resolve(&self, symbol: &str) -> Result<&Token, TypesError> {
        self.get(symbol).ok_or_else(|| TypesError::UnknownToken {
            symbol: symbol.to_string(),
        })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens ordered by symbol
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }
}

impl FromIterator<Token> for TokenRegistry {
    /// Later duplicates overwrite earlier ones; use [`TokenRegistry::register`]
    /// when duplicates must be rejected.
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let tokens = iter
            .into_iter()
            .map(|token| (Token::key(&token.symbol), token))
            .collect();
        Self { tokens }
    }
}
