//! Token Selector component
//!
//! Emits the token pair the user picked in the canvas as typed `Token`
//! outputs. The optional wallet address input exists so the selector sits
//! downstream of the connector on the canvas; the address itself is only
//! logged.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

use super::token_info;

/// Emits a configured from/to token pair
#[derive(Default)]
pub struct TokenSelector;

impl TokenSelector {
    pub const ID: &'static str = "tokenSelector";
    pub const PORT_WALLET: &'static str = "walletAddress";
    pub const PORT_FROM: &'static str = "fromToken";
    pub const PORT_TO: &'static str = "toToken";

    fn token_value(symbol: &str) -> Result<serde_json::Value> {
        let info = token_info(symbol).ok_or_else(|| {
            EngineError::node_failed(Self::ID, format!("Unknown token '{symbol}'"))
        })?;
        Ok(serde_json::json!({
            "symbol": info.symbol,
            "address": info.address,
            "decimals": info.decimals,
        }))
    }
}

#[async_trait]
impl Component for TokenSelector {
    fn definition(&self) -> ComponentDefinition {
        let options = vec![
            "ETH".to_string(),
            "USDC".to_string(),
            "DAI".to_string(),
            "WBTC".to_string(),
        ];
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::DeFi,
            label: "Token Selector".to_string(),
            description: "Selects the token pair for a swap".to_string(),
            inputs: vec![PortDefinition::optional(
                Self::PORT_WALLET,
                "Wallet Address",
                PortDataType::Address,
            )],
            outputs: vec![
                PortDefinition::required(Self::PORT_FROM, "From Token", PortDataType::Token),
                PortDefinition::required(Self::PORT_TO, "To Token", PortDataType::Token),
            ],
            configuration: vec![
                ConfigField::new("fromToken", "From Token", ConfigFieldType::Select)
                    .with_options(options.clone())
                    .with_default(serde_json::json!("ETH")),
                ConfigField::new("toToken", "To Token", ConfigFieldType::Select)
                    .with_options(options)
                    .with_default(serde_json::json!("USDC")),
            ],
            executor: ExecutorSpec::local(),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        if let Some(address) = inputs.get(Self::PORT_WALLET).and_then(|v| v.as_str()) {
            log::debug!("Selecting tokens for wallet {}", address);
        }

        let from = crate::config_str(&config, "fromToken").unwrap_or("ETH");
        let to = crate::config_str(&config, "toToken").unwrap_or("USDC");
        if from.eq_ignore_ascii_case(to) {
            return Err(EngineError::node_failed(
                Self::ID,
                format!("From and to token are both '{from}'"),
            ));
        }

        let mut outputs = Outputs::new();
        outputs.insert(Self::PORT_FROM.to_string(), Self::token_value(from)?);
        outputs.insert(Self::PORT_TO.to_string(), Self::token_value(to)?);
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(TokenSelector)));
