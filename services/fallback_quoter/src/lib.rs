//! Fallback quoter command handling
//!
//! The binary parses arguments and installs logging; everything else lives
//! here so commands can be exercised without spawning a process. Every
//! command renders pretty JSON except `config`, which prints TOML.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use quote_amm::{
    DepositPlan, DepositPlanner, FallbackQuoter, Pool, Quote, QuoteOrigin, QuoteRequest,
    QuoteSource,
};
use quote_config::SimulatorConfig;
use quote_types::Token;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List tokens known to the registry
    Tokens,

    /// List simulated pools with their current state
    Pools,

    /// Quote an exact-input swap
    Quote {
        /// Pool id, e.g. WETH-USDC-30
        #[arg(long)]
        pool: String,

        /// Symbol of the token being sold
        #[arg(long)]
        token_in: String,

        /// Amount sold, in human units
        #[arg(long)]
        amount: f64,

        /// JSON file of previously recorded live quotes to prefer over the simulator
        #[arg(long)]
        live_quotes: Option<PathBuf>,
    },

    /// Size a deposit into a price range
    Deposit {
        #[arg(long)]
        pool: String,

        /// Lower price bound, token1 per token0
        #[arg(long)]
        lower: f64,

        /// Upper price bound, token1 per token0
        #[arg(long)]
        upper: f64,

        /// token0 budget
        #[arg(long, default_value_t = 0.0)]
        amount0: f64,

        /// token1 budget
        #[arg(long, default_value_t = 0.0)]
        amount1: f64,
    },

    /// Print the effective configuration
    Config,
}

/// Pool state as shown by `pools`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub id: String,
    pub token0: String,
    pub token1: String,
    pub fee: f64,
    pub tick_spacing: i32,
    pub price: f64,
    pub tick_current: i32,
    pub liquidity: f64,
    pub initialized_ticks: usize,
    pub volume_24h_usd: f64,
}

impl From<&Pool> for PoolSummary {
    fn from(pool: &Pool) -> Self {
        Self {
            id: pool.id.clone(),
            token0: pool.token0.symbol.clone(),
            token1: pool.token1.symbol.clone(),
            fee: pool.fee,
            tick_spacing: pool.tick_spacing,
            price: pool.price(),
            tick_current: pool.tick_current,
            liquidity: pool.liquidity,
            initialized_ticks: pool.ticks.len(),
            volume_24h_usd: pool.volume_24h_usd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteReport {
    pub origin: QuoteOrigin,
    #[serde(flatten)]
    pub quote: Quote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositReport {
    pub pool_id: String,
    #[serde(flatten)]
    pub plan: DepositPlan,
}

/// Live quotes captured earlier, replayed as the live source
///
/// A request is answered only when pool, input token and amount match a
/// recorded quote exactly; anything else counts as a live failure.
#[derive(Debug, Clone, Default)]
pub struct RecordedQuotes {
    quotes: Vec<Quote>,
}

impl RecordedQuotes {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read live quotes from {}", path.display()))?;
        let quotes: Vec<Quote> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse live quotes in {}", path.display()))?;
        debug!(count = quotes.len(), "Loaded recorded live quotes");
        Ok(Self::new(quotes))
    }
}

impl QuoteSource for RecordedQuotes {
    fn quote(&self, request: &QuoteRequest) -> Result<Quote> {
        match self.quotes.iter().find(|q| {
            q.pool_id == request.pool_id
                && q.token_in.eq_ignore_ascii_case(&request.token_in)
                && q.amount_in == request.amount_in
        }) {
            Some(quote) => Ok(quote.clone()),
            None => bail!(
                "No live quote for {} {} in pool '{}'",
                request.amount_in,
                request.token_in,
                request.pool_id
            ),
        }
    }

    fn source_name(&self) -> &str {
        "recorded"
    }
}

/// Execute `command` against `config` and render its output
pub fn run(config: &SimulatorConfig, command: &Command) -> Result<String> {
    match command {
        Command::Tokens => {
            let registry = config.token_registry()?;
            let tokens: Vec<&Token> = registry.iter().collect();
            to_json(&tokens)
        }
        Command::Pools => {
            let quoter = config.quoter()?;
            let pools: Vec<PoolSummary> = quoter.pools().map(PoolSummary::from).collect();
            to_json(&pools)
        }
        Command::Quote {
            pool,
            token_in,
            amount,
            live_quotes,
        } => {
            let live = match live_quotes {
                Some(path) => RecordedQuotes::from_file(path)?,
                None => RecordedQuotes::default(),
            };
            let quoter = FallbackQuoter::new(live, config.quoter()?);
            let request = QuoteRequest::new(pool.as_str(), token_in.as_str(), *amount);
            let (quote, origin) = quoter.quote_with_origin(&request)?;

            info!(
                pool_id = %quote.pool_id,
                amount_out = %quote.amount_out,
                origin = ?origin,
                "Quoted swap"
            );
            to_json(&QuoteReport { origin, quote })
        }
        Command::Deposit {
            pool,
            lower,
            upper,
            amount0,
            amount1,
        } => {
            let quoter = config.quoter()?;
            let target = quoter
                .pool(pool)
                .with_context(|| format!("Unknown pool '{pool}'"))?;
            let plan = DepositPlanner::new(config.deposit_config())
                .plan(target, *lower, *upper, *amount0, *amount1)
                .with_context(|| format!("Cannot size deposit into '{pool}'"))?;
            to_json(&DepositReport {
                pool_id: target.id.clone(),
                plan,
            })
        }
        Command::Config => config.to_toml_string(),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to render output")
}
