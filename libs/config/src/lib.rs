//! # Quote Engine Configuration
//!
//! Layered configuration for the fallback quote engine: a base TOML file,
//! an optional per-environment overlay, and `QUOTE__` environment variables.
//!
//! ## Features
//!
//! - **Token Registry**: extra tokens on top of the built-in set
//! - **Pool Book**: pairs, mid prices, fee tiers and tick spacing to simulate
//! - **Engine Settings**: iteration cap, liquidity shape, deposit buffer
//!
//! ## Usage
//!
//! ```no_run
//! use quote_config::SimulatorConfig;
//!
//! let config = SimulatorConfig::load(None, Some("staging"))?;
//! let quoter = config.quoter()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod defaults;
pub mod simulator_config;

// Re-export commonly used types
pub use simulator_config::{
    load_config, DepositSettings, GeneratorConfig, GlobalConfig, PoolSettings, SimulatorConfig,
    SwapConfig,
};
