//! 1inch Quote component
//!
//! Fetches the expected output amount for a token swap. On mainnet this
//! hits the 1inch swap API; off mainnet it prices against a fixed rate
//! table so canvases stay runnable without credentials.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

use crate::client::OneInchClient;
use super::{format_units, parse_units, resolve_token, token_info};

/// Fixed rates used off-mainnet, from-symbol -> to-symbol -> rate
const SIMULATED_RATES: &[(&str, &str, f64)] = &[
    ("ETH", "USDC", 2500.0),
    ("ETH", "DAI", 2500.0),
    ("ETH", "WBTC", 0.04),
    ("USDC", "ETH", 0.0004),
    ("USDC", "DAI", 1.0),
    ("DAI", "USDC", 1.0),
    ("WBTC", "ETH", 25.0),
    ("WBTC", "USDC", 62500.0),
];

const SIMULATED_GAS: u64 = 210_000;

/// Quotes a token swap through 1inch
#[derive(Default)]
pub struct OneInchQuote;

impl OneInchQuote {
    pub const ID: &'static str = "oneInchQuote";
    pub const PORT_FROM: &'static str = "fromToken";
    pub const PORT_TO: &'static str = "toToken";
    pub const PORT_AMOUNT: &'static str = "amount";
    pub const PORT_QUOTE: &'static str = "quoteAmount";
    pub const PORT_GAS: &'static str = "estimatedGas";

    fn simulated_rate(from: &str, to: &str) -> f64 {
        SIMULATED_RATES
            .iter()
            .find(|(f, t, _)| f.eq_ignore_ascii_case(from) && t.eq_ignore_ascii_case(to))
            .map(|(_, _, rate)| *rate)
            .unwrap_or(1.0)
    }
}

#[async_trait]
impl Component for OneInchQuote {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::DeFi,
            label: "1inch Quote".to_string(),
            description: "Fetches a swap quote from the 1inch aggregator".to_string(),
            inputs: vec![
                PortDefinition::required(Self::PORT_FROM, "From Token", PortDataType::Token),
                PortDefinition::required(Self::PORT_TO, "To Token", PortDataType::Token),
                PortDefinition::optional(Self::PORT_AMOUNT, "Amount", PortDataType::TokenAmount),
            ],
            outputs: vec![
                PortDefinition::required(Self::PORT_QUOTE, "Quote", PortDataType::TokenAmount),
                PortDefinition::optional(Self::PORT_GAS, "Estimated Gas", PortDataType::Number),
            ],
            configuration: vec![
                ConfigField::new("amount", "Amount", ConfigFieldType::Text)
                    .with_default(serde_json::json!("1.0")),
                ConfigField::new("chainId", "Chain ID", ConfigFieldType::Number)
                    .with_default(serde_json::json!(1)),
                ConfigField::new("apiKey", "1inch API Key", ConfigFieldType::Secret).sensitive(),
            ],
            executor: ExecutorSpec::http("https://api.1inch.dev/swap").with_timeout_ms(10_000),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        let (from_symbol, from_address) = inputs
            .get(Self::PORT_FROM)
            .and_then(resolve_token)
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'fromToken' is missing or not a token")
            })?;
        let (to_symbol, to_address) = inputs
            .get(Self::PORT_TO)
            .and_then(resolve_token)
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'toToken' is missing or not a token")
            })?;

        // Connected amount wins over the configured one
        let amount = inputs
            .get(Self::PORT_AMOUNT)
            .and_then(|v| v.as_str())
            .or_else(|| crate::config_str(&config, "amount"))
            .unwrap_or("1.0")
            .to_string();

        let mut outputs = Outputs::new();
        if crate::is_mainnet(&config) {
            let from_decimals = token_info(&from_symbol).map(|t| t.decimals).unwrap_or(18);
            let to_decimals = token_info(&to_symbol).map(|t| t.decimals).unwrap_or(18);
            let raw_amount = parse_units(&amount, from_decimals).ok_or_else(|| {
                EngineError::node_failed(Self::ID, format!("Invalid amount '{amount}'"))
            })?;

            let chain_id = crate::config_f64(&config, "chainId").unwrap_or(1.0) as u64;
            let client =
                OneInchClient::new(crate::config_str(&config, "apiKey").map(String::from));
            let quote = client
                .quote(chain_id, &from_address, &to_address, &raw_amount)
                .await
                .map_err(|e| EngineError::node_failed(Self::ID, e.to_string()))?;

            outputs.insert(
                Self::PORT_QUOTE.to_string(),
                serde_json::json!(format_units(&quote.dst_amount, to_decimals)),
            );
            if let Some(gas) = quote.gas {
                outputs.insert(Self::PORT_GAS.to_string(), serde_json::json!(gas));
            }
        } else {
            let parsed: f64 = amount.parse().map_err(|_| {
                EngineError::node_failed(Self::ID, format!("Invalid amount '{amount}'"))
            })?;
            let quoted = parsed * Self::simulated_rate(&from_symbol, &to_symbol);
            log::debug!(
                "Simulated quote: {} {} -> {} {}",
                amount,
                from_symbol,
                quoted,
                to_symbol
            );
            outputs.insert(Self::PORT_QUOTE.to_string(), serde_json::json!(quoted.to_string()));
            outputs.insert(Self::PORT_GAS.to_string(), serde_json::json!(SIMULATED_GAS));
        }
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(OneInchQuote)));
