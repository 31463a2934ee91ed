//! Wallet Balance component
//!
//! Reads a token balance for an address. On mainnet this queries the
//! 1inch balance endpoint; on testnet it returns a deterministic
//! simulated balance so workflows can be exercised without an API key.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

use crate::client::OneInchClient;
use crate::defi::{format_units, token_info};

/// Simulated balance used off-mainnet
const SIMULATED_BALANCE: &str = "1.5";

/// Reads a token balance for a wallet address
#[derive(Default)]
pub struct WalletBalance;

impl WalletBalance {
    pub const ID: &'static str = "walletBalance";
    pub const PORT_ADDRESS: &'static str = "address";
    pub const PORT_BALANCE: &'static str = "balance";
    pub const PORT_SYMBOL: &'static str = "symbol";
}

#[async_trait]
impl Component for WalletBalance {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::Wallet,
            label: "Wallet Balance".to_string(),
            description: "Reads a token balance for a wallet address".to_string(),
            inputs: vec![PortDefinition::required(
                Self::PORT_ADDRESS,
                "Address",
                PortDataType::Address,
            )],
            outputs: vec![
                PortDefinition::required(Self::PORT_BALANCE, "Balance", PortDataType::TokenAmount),
                PortDefinition::optional(Self::PORT_SYMBOL, "Symbol", PortDataType::String),
            ],
            configuration: vec![
                ConfigField::new("token", "Token", ConfigFieldType::Select)
                    .with_options(vec![
                        "ETH".to_string(),
                        "USDC".to_string(),
                        "DAI".to_string(),
                        "WBTC".to_string(),
                    ])
                    .with_default(serde_json::json!("ETH")),
                ConfigField::new("chainId", "Chain ID", ConfigFieldType::Number)
                    .with_default(serde_json::json!(1)),
                ConfigField::new("apiKey", "1inch API Key", ConfigFieldType::Secret).sensitive(),
            ],
            executor: ExecutorSpec::http("https://api.1inch.dev/balance").with_timeout_ms(10_000),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        let address = inputs
            .get(Self::PORT_ADDRESS)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'address' is missing or not a string")
            })?;

        let symbol = crate::config_str(&config, "token").unwrap_or("ETH").to_string();
        let token = token_info(&symbol)
            .ok_or_else(|| EngineError::node_failed(Self::ID, format!("Unknown token '{symbol}'")))?;

        let balance = if crate::is_mainnet(&config) {
            let chain_id = crate::config_f64(&config, "chainId").unwrap_or(1.0) as u64;
            let client =
                OneInchClient::new(crate::config_str(&config, "apiKey").map(String::from));
            let balances = client
                .balances(chain_id, address)
                .await
                .map_err(|e| EngineError::node_failed(Self::ID, e.to_string()))?;
            let raw = balances
                .get(token.address)
                .map(String::as_str)
                .unwrap_or("0");
            format_units(raw, token.decimals)
        } else {
            log::debug!("Simulating {} balance for {}", symbol, address);
            SIMULATED_BALANCE.to_string()
        };

        let mut outputs = Outputs::new();
        outputs.insert(Self::PORT_BALANCE.to_string(), serde_json::json!(balance));
        outputs.insert(Self::PORT_SYMBOL.to_string(), serde_json::json!(symbol));
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(WalletBalance)));
