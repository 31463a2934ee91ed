//! Chain Selector component
//!
//! Emits the chain the user picked in the canvas as a typed `Chain`
//! output, so downstream nodes (quotes, swaps, balances) run against the
//! right network without each carrying its own chain dropdown.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

/// Chains the selector offers, name -> numeric chain id
pub const SUPPORTED_CHAINS: &[(&str, u64)] = &[
    ("ethereum", 1),
    ("polygon", 137),
    ("arbitrum", 42_161),
    ("optimism", 10),
    ("base", 8453),
];

/// Emits a configured chain as id and name
#[derive(Default)]
pub struct ChainSelector;

impl ChainSelector {
    pub const ID: &'static str = "chainSelector";
    pub const PORT_CHAIN_ID: &'static str = "chainId";
    pub const PORT_CHAIN_NAME: &'static str = "chainName";

    fn chain_id(name: &str) -> Option<u64> {
        SUPPORTED_CHAINS
            .iter()
            .find(|(chain, _)| chain.eq_ignore_ascii_case(name))
            .map(|(_, id)| *id)
    }
}

#[async_trait]
impl Component for ChainSelector {
    fn definition(&self) -> ComponentDefinition {
        let options: Vec<String> = SUPPORTED_CHAINS
            .iter()
            .map(|(chain, _)| chain.to_string())
            .collect();
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::DeFi,
            label: "Chain Selector".to_string(),
            description: "Selects the chain a workflow runs against".to_string(),
            inputs: vec![],
            outputs: vec![
                PortDefinition::required(Self::PORT_CHAIN_ID, "Chain", PortDataType::Chain),
                PortDefinition::optional(
                    Self::PORT_CHAIN_NAME,
                    "Chain Name",
                    PortDataType::String,
                ),
            ],
            configuration: vec![ConfigField::new("chain", "Chain", ConfigFieldType::Select)
                .with_options(options)
                .with_default(serde_json::json!("ethereum"))],
            executor: ExecutorSpec::local(),
        }
    }

    async fn execute(&self, _inputs: Inputs, config: Config) -> Result<Outputs> {
        let chain = crate::config_str(&config, "chain").unwrap_or("ethereum");
        let chain_id = Self::chain_id(chain).ok_or_else(|| {
            EngineError::node_failed(Self::ID, format!("Unsupported chain '{chain}'"))
        })?;

        log::debug!("Selected chain {} ({})", chain, chain_id);

        let mut outputs = Outputs::new();
        outputs.insert(Self::PORT_CHAIN_ID.to_string(), serde_json::json!(chain_id));
        outputs.insert(
            Self::PORT_CHAIN_NAME.to_string(),
            serde_json::json!(chain.to_lowercase()),
        );
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(ChainSelector)));

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_chain_is_ethereum() {
        let outputs = ChainSelector.execute(Inputs::new(), Config::new()).await.unwrap();
        assert_eq!(outputs.get("chainId").unwrap(), &serde_json::json!(1));
        assert_eq!(outputs.get("chainName").unwrap(), "ethereum");
    }

    #[tokio::test]
    async fn test_configured_chain() {
        let mut config = Config::new();
        config.insert("chain".to_string(), serde_json::json!("Polygon"));

        let outputs = ChainSelector.execute(Inputs::new(), config).await.unwrap();
        assert_eq!(outputs.get("chainId").unwrap(), &serde_json::json!(137));
        assert_eq!(outputs.get("chainName").unwrap(), "polygon");
    }

    #[tokio::test]
    async fn test_unsupported_chain_rejected() {
        let mut config = Config::new();
        config.insert("chain".to_string(), serde_json::json!("dogechain"));

        let err = ChainSelector.execute(Inputs::new(), config).await.unwrap_err();
        assert!(err.to_string().contains("dogechain"));
    }
}
