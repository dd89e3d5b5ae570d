//! Quote source abstraction and the live → simulated fallback
//!
//! The terminal prefers a live on-chain quote. When that request fails it
//! answers from the simulator instead of showing nothing.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::quote::{PoolQuoter, Quote, QuoteRequest};

/// Anything that can price an exact-input swap
pub trait QuoteSource {
    fn quote(&self, request: &QuoteRequest) -> Result<Quote>;

    /// Label used in logs
    fn source_name(&self) -> &str;
}

impl QuoteSource for PoolQuoter {
    fn quote(&self, request: &QuoteRequest) -> Result<Quote> {
        Ok(self.quote_exact_in(request)?)
    }

    fn source_name(&self) -> &str {
        "simulator"
    }
}

/// Which source produced a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteOrigin {
    Live,
    Simulated,
}

/// Tries `live` first and falls back to the simulator on any error
#[derive(Debug, Clone)]
pub struct FallbackQuoter<L> {
    live: L,
    simulator: PoolQuoter,
}

impl<L: QuoteSource> FallbackQuoter<L> {
    pub fn new(live: L, simulator: PoolQuoter) -> Self {
        Self { live, simulator }
    }

    pub fn simulator(&self) -> &PoolQuoter {
        &self.simulator
    }

    /// Quote and report where the answer came from
    ///
    /// Fails only when both sources fail; the simulator's error is returned
    /// with the live failure attached as context.
    pub fn quote_with_origin(&self, request: &QuoteRequest) -> Result<(Quote, QuoteOrigin)> {
        match self.live.quote(request) {
            Ok(quote) => Ok((quote, QuoteOrigin::Live)),
            Err(live_err) => {
                warn!(
                    source = self.live.source_name(),
                    pool_id = %request.pool_id,
                    error = %live_err,
                    "Live quote failed, using simulated pool"
                );
                let quote = self
                    .simulator
                    .quote(request)
                    .map_err(|sim_err| sim_err.context(format!("live quote also failed: {live_err}")))?;
                Ok((quote, QuoteOrigin::Simulated))
            }
        }
    }
}

impl<L: QuoteSource> QuoteSource for FallbackQuoter<L> {
    fn quote(&self, request: &QuoteRequest) -> Result<Quote> {
        self.quote_with_origin(request).map(|(quote, _)| quote)
    }

    fn source_name(&self) -> &str {
        "fallback"
    }
}
