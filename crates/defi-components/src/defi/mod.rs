//! DeFi components: chain and token selection, 1inch quotes, swaps and
//! limit orders, price impact analysis

pub mod chain_selector;
pub mod limit_order;
pub mod price_impact;
pub mod quote;
pub mod swap;
pub mod token_selector;

pub use chain_selector::ChainSelector;
pub use limit_order::LimitOrder;
pub use price_impact::PriceImpactCalculator;
pub use quote::OneInchQuote;
pub use swap::OneInchSwap;
pub use token_selector::TokenSelector;

/// A token the built-in components know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub address: &'static str,
    pub decimals: u8,
}

/// Tokens offered by the selector and resolvable by symbol.
///
/// Mainnet contract addresses; the 1inch convention uses the
/// 0xeeee... pseudo-address for the native coin.
pub const KNOWN_TOKENS: &[TokenInfo] = &[
    TokenInfo {
        symbol: "ETH",
        address: "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
        decimals: 18,
    },
    TokenInfo {
        symbol: "USDC",
        address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
        decimals: 6,
    },
    TokenInfo {
        symbol: "DAI",
        address: "0x6b175474e89094c44da98b954eedeac495271d0f",
        decimals: 18,
    },
    TokenInfo {
        symbol: "WBTC",
        address: "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599",
        decimals: 8,
    },
];

/// Look up a known token by its symbol (case-insensitive)
pub fn token_info(symbol: &str) -> Option<&'static TokenInfo> {
    KNOWN_TOKENS
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}

/// Resolve a token value (either a `{symbol, address, decimals}` object or
/// a bare symbol string) to its contract address and symbol.
pub(crate) fn resolve_token(value: &serde_json::Value) -> Option<(String, String)> {
    match value {
        serde_json::Value::Object(map) => {
            let symbol = map.get("symbol")?.as_str()?.to_string();
            let address = match map.get("address").and_then(|a| a.as_str()) {
                Some(address) => address.to_string(),
                None => token_info(&symbol)?.address.to_string(),
            };
            Some((symbol, address))
        }
        serde_json::Value::String(symbol) => {
            let info = token_info(symbol)?;
            Some((info.symbol.to_string(), info.address.to_string()))
        }
        _ => None,
    }
}

/// Convert a raw smallest-unit amount to a decimal string, trimming
/// trailing zeros (`"1500000"` with 6 decimals -> `"1.5"`).
pub(crate) fn format_units(raw: &str, decimals: u8) -> String {
    let Ok(value) = raw.parse::<u128>() else {
        return raw.to_string();
    };
    let scale = 10u128.pow(decimals as u32);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Convert a decimal amount string to raw smallest units
/// (`"1.5"` with 6 decimals -> `"1500000"`). `None` if unparseable or the
/// fractional part exceeds the token's precision.
pub(crate) fn parse_units(amount: &str, decimals: u8) -> Option<String> {
    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if frac.len() > decimals as usize {
        return None;
    }
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac_value: u128 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    let scale = 10u128.pow(decimals as u32);
    let frac_scale = 10u128.pow((decimals as usize - frac.len()) as u32);
    Some(
        whole
            .checked_mul(scale)?
            .checked_add(frac_value.checked_mul(frac_scale)?)?
            .to_string(),
    )
}
