//! Configuration defaults
//!
//! Default locations and values shared by the loader and the CLI.

/// Configuration file locations
pub mod paths {
    /// Base configuration file, optional unless a path is given explicitly
    pub const DEFAULT_CONFIG_FILE: &str = "config/quoter.toml";

    /// Directory holding `<environment>.toml` overlays
    pub const ENVIRONMENTS_DIR: &str = "config/environments";
}

/// Environment variable overrides
pub mod env {
    /// `QUOTE__SWAP__MAX_ITERATIONS=500` sets `swap.max_iterations`
    pub const ENV_PREFIX: &str = "QUOTE";

    /// Separates the prefix and nested keys
    pub const ENV_SEPARATOR: &str = "__";
}

/// Logging defaults
pub mod logging {
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

/// Pool parameter bounds
pub mod pools {
    /// Fees are a fraction of input and must stay below this
    pub const MAX_FEE: f64 = 1.0;

    /// Deposit buffer cannot hold back more than the whole budget
    pub const MAX_BUFFER_BPS: u32 = 10_000;
}
