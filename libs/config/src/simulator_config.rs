//! Simulator Configuration Module
//!
//! Loads the quote engine's settings from TOML with environment-specific
//! overlays and `QUOTE__` environment variable overrides, validates them,
//! and turns them into the registry, engine and pool book the quoter needs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use quote_amm::{
    DepositConfig, LiquidityShape, Pool, PoolGenerator, PoolParams, PoolQuoter, RangeShape,
    SwapEngine, DEFAULT_MAX_ITERATIONS, MAX_TICK,
};
use quote_types::{Token, TokenRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::defaults::{env, logging, paths, pools};

/// Main simulator configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Global settings
    pub global: GlobalConfig,

    /// Swap walk settings
    pub swap: SwapConfig,

    /// Synthetic liquidity shape
    pub generator: GeneratorConfig,

    /// Deposit sizing
    pub deposit: DepositSettings,

    /// Tokens registered on top of the built-in registry
    pub tokens: Vec<Token>,

    /// Pools the quoter serves
    pub pools: Vec<PoolSettings>,
}

/// Global configuration settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SwapConfig {
    pub max_iterations: usize,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub base_liquidity: f64,
    pub ranges: Vec<RangeShape>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let shape = LiquidityShape::default();
        Self {
            base_liquidity: shape.base_liquidity,
            ranges: shape.ranges,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DepositSettings {
    pub budget_buffer_bps: u32,
}

/// One pool to synthesize around a mid price
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PoolSettings {
    pub id: String,
    pub token0: String,
    pub token1: String,
    /// Price of token0 in token1
    pub mid_price: f64,
    pub fee: f64,
    pub tick_spacing: i32,
    #[serde(default)]
    pub volume_24h_usd: f64,
}

impl SimulatorConfig {
    /// Load configuration from files with environment overrides
    ///
    /// `base_path` defaults to `config/quoter.toml`; the default file may be
    /// absent, an explicitly given one may not.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        Self::load_from(
            base_path,
            Path::new(paths::ENVIRONMENTS_DIR),
            environment,
            env::ENV_PREFIX,
        )
    }

    /// [`load`](Self::load) with explicit overlay directory and variable prefix
    pub fn load_from(
        base_path: Option<&Path>,
        environments_dir: &Path,
        environment: Option<&str>,
        env_prefix: &str,
    ) -> Result<Self> {
        let (base, required) = match base_path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(paths::DEFAULT_CONFIG_FILE), false),
        };
        debug!(path = ?base, required, "Loading base config");

        let mut builder = Config::builder().add_source(File::from(base.as_path()).required(required));

        // Add environment-specific overrides if specified
        if let Some(env_name) = environment {
            let env_file = environments_dir.join(format!("{env_name}.toml"));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (QUOTE__ prefix)
        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator(env::ENV_SEPARATOR)
                .separator(env::ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", base.display()))?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Parse a single TOML document, without overlays
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Reject settings the simulator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.swap.max_iterations == 0 {
            bail!("swap.max_iterations must be at least 1");
        }

        if !is_positive(self.generator.base_liquidity) {
            bail!(
                "generator.base_liquidity must be positive and finite, got {}",
                self.generator.base_liquidity
            );
        }
        if self.generator.ranges.is_empty() {
            bail!("generator.ranges must contain at least one range");
        }
        for (i, range) in self.generator.ranges.iter().enumerate() {
            if range.half_width <= 0 || range.half_width > MAX_TICK {
                bail!(
                    "generator.ranges[{i}].half_width must be in 1..={MAX_TICK}, got {}",
                    range.half_width
                );
            }
            if !is_positive(range.weight) {
                bail!("generator.ranges[{i}].weight must be positive and finite, got {}", range.weight);
            }
        }

        if self.deposit.budget_buffer_bps > pools::MAX_BUFFER_BPS {
            bail!(
                "deposit.budget_buffer_bps must be at most {}, got {}",
                pools::MAX_BUFFER_BPS,
                self.deposit.budget_buffer_bps
            );
        }

        let registry = self.token_registry()?;
        let mut seen = HashSet::new();
        for pool in &self.pools {
            validate_pool(pool, &registry)?;
            if !seen.insert(pool.id.as_str()) {
                bail!("Duplicate pool id '{}'", pool.id);
            }
        }

        Ok(())
    }

    /// Built-in tokens plus the configured extras
    pub fn token_registry(&self) -> Result<TokenRegistry> {
        let mut registry = TokenRegistry::with_defaults();
        for token in &self.tokens {
            registry
                .register(token.clone())
                .with_context(|| format!("Invalid token entry '{}'", token.symbol))?;
        }
        Ok(registry)
    }

    pub fn liquidity_shape(&self) -> LiquidityShape {
        LiquidityShape {
            base_liquidity: self.generator.base_liquidity,
            ranges: self.generator.ranges.clone(),
        }
    }

    pub fn swap_engine(&self) -> SwapEngine {
        SwapEngine::new(self.swap.max_iterations)
    }

    pub fn deposit_config(&self) -> DepositConfig {
        DepositConfig {
            budget_buffer_bps: self.deposit.budget_buffer_bps,
        }
    }

    /// Resolve pool token symbols against `registry`
    pub fn pool_params(&self, registry: &TokenRegistry) -> Result<Vec<PoolParams>> {
        self.pools
            .iter()
            .map(|pool| {
                let mut params = PoolParams::from_symbols(
                    registry,
                    pool.id.as_str(),
                    &pool.token0,
                    &pool.token1,
                    pool.mid_price,
                    pool.fee,
                    pool.tick_spacing,
                )
                .with_context(|| format!("Invalid pool '{}'", pool.id))?;
                params.volume_24h_usd = pool.volume_24h_usd;
                Ok(params)
            })
            .collect()
    }

    /// Generate every configured pool with the configured shape
    pub fn build_pools(&self, registry: &TokenRegistry) -> Result<Vec<Pool>> {
        let generator = PoolGenerator::new(self.liquidity_shape());
        let pools: Vec<Pool> = self
            .pool_params(registry)?
            .iter()
            .map(|params| generator.generate(params))
            .collect();

        info!(pools = pools.len(), "Built simulated pools");
        Ok(pools)
    }

    /// Validated quoter over the configured pool book
    pub fn quoter(&self) -> Result<PoolQuoter> {
        self.validate()?;
        let registry = self.token_registry()?;
        let pools = self.build_pools(&registry)?;
        PoolQuoter::with_pools(self.swap_engine(), pools).context("Failed to assemble pool book")
    }
}

/// Convenience function to load and validate configuration with defaults
pub fn load_config(environment: Option<&str>) -> Result<SimulatorConfig> {
    let config = SimulatorConfig::load(None, environment)?;
    config.validate()?;
    Ok(config)
}

fn validate_pool(pool: &PoolSettings, registry: &TokenRegistry) -> Result<()> {
    if pool.id.trim().is_empty() {
        bail!("Pool id must not be empty");
    }
    for symbol in [&pool.token0, &pool.token1] {
        if !registry.contains(symbol) {
            bail!("Pool '{}' references unknown token '{}'", pool.id, symbol);
        }
    }
    if pool.token0.eq_ignore_ascii_case(&pool.token1) {
        bail!("Pool '{}' pairs '{}' with itself", pool.id, pool.token0);
    }
    if !is_positive(pool.mid_price) {
        bail!("Pool '{}' mid_price must be positive and finite, got {}", pool.id, pool.mid_price);
    }
    if !pool.fee.is_finite() || pool.fee < 0.0 || pool.fee >= pools::MAX_FEE {
        bail!("Pool '{}' fee must be in [0, 1), got {}", pool.id, pool.fee);
    }
    if pool.tick_spacing <= 0 {
        bail!("Pool '{}' tick_spacing must be positive, got {}", pool.id, pool.tick_spacing);
    }
    if !pool.volume_24h_usd.is_finite() || pool.volume_24h_usd < 0.0 {
        bail!("Pool '{}' volume_24h_usd must be non-negative, got {}", pool.id, pool.volume_24h_usd);
    }
    Ok(())
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
