//! # Quote Types
//!
//! Token definitions shared by the AMM simulator, the configuration layer and
//! the quoting service.
//!
//! ## Design Philosophy
//!
//! - **Injected, not global**: the [`TokenRegistry`] is a value the caller
//!   builds and passes around. Nothing in this crate holds module-level state.
//! - **Native precision**: every [`Token`] carries its on-chain decimals so
//!   simulated amounts can be truncated to what the token can represent.
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_types::{Token, TokenRegistry};
//!
//! let mut registry = TokenRegistry::with_defaults();
//! registry.register(Token::new("GMX", "GMX", 18)?)?;
//!
//! let usdc = registry.resolve("usdc")?;
//! assert_eq!(usdc.decimals, 6);
//! # Ok::<(), quote_types::TypesError>(())
//! ```

pub mod errors;
pub mod token;

pub use errors::TypesError;
pub use token::{Token, TokenRegistry, MAX_TOKEN_DECIMALS};
