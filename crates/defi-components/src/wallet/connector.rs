//! Wallet Connector component
//!
//! Entry point of most workflows: surfaces the wallet address the user
//! connected in the UI. The headless engine never talks to a browser
//! wallet itself; the canvas writes the connected address into this
//! node's configuration and downstream nodes consume it as a typed
//! `Address` output.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

/// Surfaces the UI-connected wallet as workflow outputs
#[derive(Default)]
pub struct WalletConnector;

impl WalletConnector {
    pub const ID: &'static str = "walletConnector";
    pub const PORT_ADDRESS: &'static str = "address";
    pub const PORT_CHAIN_ID: &'static str = "chainId";
}

#[async_trait]
impl Component for WalletConnector {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::Wallet,
            label: "Wallet Connector".to_string(),
            description: "Provides the connected wallet address and chain".to_string(),
            inputs: vec![],
            outputs: vec![
                PortDefinition::required(Self::PORT_ADDRESS, "Address", PortDataType::Address),
                PortDefinition::optional(Self::PORT_CHAIN_ID, "Chain", PortDataType::Chain),
            ],
            configuration: vec![
                ConfigField::new("address", "Wallet Address", ConfigFieldType::Text).required(),
                ConfigField::new("chainId", "Chain ID", ConfigFieldType::Number)
                    .with_default(serde_json::json!(1)),
            ],
            executor: ExecutorSpec::local(),
        }
    }

    async fn execute(&self, _inputs: Inputs, config: Config) -> Result<Outputs> {
        let address = crate::config_str(&config, "address")
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "No wallet connected: address is not set")
            })?;

        let chain_id = crate::config_f64(&config, "chainId").unwrap_or(1.0) as u64;

        log::debug!("Wallet connected: {} (chain {})", address, chain_id);

        let mut outputs = Outputs::new();
        outputs.insert(Self::PORT_ADDRESS.to_string(), serde_json::json!(address));
        outputs.insert(Self::PORT_CHAIN_ID.to_string(), serde_json::json!(chain_id));
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(WalletConnector)));
