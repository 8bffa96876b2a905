//! Gateway configuration
//!
//! Resolved once at startup from the process environment:
//! - `GATEWAY_ADDR`     — listen address (default `127.0.0.1:1234`)
//! - `GATEWAY_MAX_BUY`  — exclusive buy exposure limit (default 20)
//! - `GATEWAY_MAX_SELL` — exclusive sell exposure limit (default 15)

use std::net::SocketAddr;

use risk_engine::config::InvalidLimit;
use risk_engine::RiskLimits;
use thiserror::Error;

/// Default listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:1234";
/// Default exclusive buy exposure limit
pub const DEFAULT_MAX_BUY: i64 = 20;
/// Default exclusive sell exposure limit
pub const DEFAULT_MAX_SELL: i64 = 15;

/// Configuration errors, fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error(transparent)]
    Limit(#[from] InvalidLimit),
}

/// Startup configuration for the gateway process
#[derive(Debug, Clone, Copy)]
pub struct GatewayConfig {
    /// Address the listening socket binds to
    pub addr: SocketAddr,
    /// Per-session exposure limits handed to every dispatcher
    pub limits: RiskLimits,
}

impl GatewayConfig {
    /// Resolve configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = read_var("GATEWAY_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                name: "GATEWAY_ADDR",
                value: read_var("GATEWAY_ADDR").unwrap_or_default(),
            })?;

        let max_buy = read_limit("GATEWAY_MAX_BUY", DEFAULT_MAX_BUY)?;
        let max_sell = read_limit("GATEWAY_MAX_SELL", DEFAULT_MAX_SELL)?;
        let limits = RiskLimits::new(max_buy, max_sell)?;

        Ok(Self { addr, limits })
    }
}

fn read_var(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn read_limit(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match read_var(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}
