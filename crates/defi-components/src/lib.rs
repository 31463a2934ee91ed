//! DeFi Components
//!
//! Built-in component implementations for the ChainCanvas workflow engine.
//! Each component is an atomic building block the canvas can drop onto a
//! workflow and wire to others through typed ports.
//!
//! # Categories
//!
//! - **Wallet**: connect a wallet, read balances
//! - **DeFi**: chain and token selection, 1inch quotes, swaps and limit
//!   orders, price impact analysis
//! - **Bridge**: cross-chain transfers (simulated)
//! - **Logic**: conditional routing, delays
//! - **Data**: JSON transformation
//! - **Display**: dashboard aggregation
//!
//! All components register themselves at link time via `inventory`;
//! `ComponentRegistry::with_builtins()` picks them up.

pub mod bridge;
pub mod client;
pub mod data;
pub mod defi;
pub mod display;
pub mod logic;
pub mod wallet;

pub use client::{OneInchClient, OneInchError};

use flow_engine::Config;

/// Reserved config key the engine uses to surface the run environment
pub(crate) const ENVIRONMENT_KEY: &str = "environment";

/// Whether this run targets live chain APIs.
///
/// Anything other than an explicit `"mainnet"` is treated as testnet, so
/// components simulate instead of spending real funds by accident.
pub(crate) fn is_mainnet(config: &Config) -> bool {
    config
        .get(ENVIRONMENT_KEY)
        .and_then(|v| v.as_str())
        .map(|env| env == "mainnet")
        .unwrap_or(false)
}

/// Read a string config value
pub(crate) fn config_str<'a>(config: &'a Config, key: &str) -> Option<&'a str> {
    config.get(key).and_then(|v| v.as_str())
}

/// Read a numeric config value, accepting both numbers and numeric strings
/// (canvas form fields serialize both ways)
pub(crate) fn config_f64(config: &Config, key: &str) -> Option<f64> {
    match config.get(key) {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}
