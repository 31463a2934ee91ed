//! Bridge Transfer component
//!
//! Simulated cross-chain transfer. The real locking protocol runs inside
//! the user's generated app; within the canvas this component produces
//! the pair of transactions a bridge run would yield (source-chain lock,
//! destination-chain release) so downstream nodes can be wired and
//! exercised end to end.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

const SUPPORTED_CHAINS: &[&str] = &["ethereum", "polygon", "arbitrum", "optimism", "base"];

/// Simulated cross-chain token transfer
#[derive(Default)]
pub struct BridgeTransfer;

impl BridgeTransfer {
    pub const ID: &'static str = "bridgeTransfer";
    pub const PORT_AMOUNT: &'static str = "amount";
    pub const PORT_RECIPIENT: &'static str = "recipient";
    pub const PORT_TRANSACTION: &'static str = "transaction";
    pub const PORT_DESTINATION_TX: &'static str = "destinationTx";

    fn check_chain(chain: &str) -> Result<()> {
        if SUPPORTED_CHAINS.contains(&chain) {
            Ok(())
        } else {
            Err(EngineError::node_failed(
                Self::ID,
                format!("Unsupported chain '{chain}'"),
            ))
        }
    }
}

#[async_trait]
impl Component for BridgeTransfer {
    fn definition(&self) -> ComponentDefinition {
        let chains: Vec<String> = SUPPORTED_CHAINS.iter().map(|c| c.to_string()).collect();
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::Bridge,
            label: "Bridge Transfer".to_string(),
            description: "Transfers tokens across chains".to_string(),
            inputs: vec![
                PortDefinition::required(Self::PORT_AMOUNT, "Amount", PortDataType::TokenAmount),
                PortDefinition::optional(Self::PORT_RECIPIENT, "Recipient", PortDataType::Address),
            ],
            outputs: vec![
                PortDefinition::required(
                    Self::PORT_TRANSACTION,
                    "Source Tx",
                    PortDataType::Transaction,
                ),
                PortDefinition::required(
                    Self::PORT_DESTINATION_TX,
                    "Destination Tx",
                    PortDataType::Transaction,
                ),
            ],
            configuration: vec![
                ConfigField::new("sourceChain", "Source Chain", ConfigFieldType::Select)
                    .with_options(chains.clone())
                    .with_default(serde_json::json!("ethereum")),
                ConfigField::new("destinationChain", "Destination Chain", ConfigFieldType::Select)
                    .with_options(chains)
                    .with_default(serde_json::json!("polygon")),
            ],
            executor: ExecutorSpec::local().with_timeout_ms(60_000),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        let amount = inputs
            .get(Self::PORT_AMOUNT)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'amount' is missing or not a string")
            })?;

        let source = crate::config_str(&config, "sourceChain").unwrap_or("ethereum");
        let destination = crate::config_str(&config, "destinationChain").unwrap_or("polygon");
        Self::check_chain(source)?;
        Self::check_chain(destination)?;
        if source == destination {
            return Err(EngineError::node_failed(
                Self::ID,
                format!("Source and destination chain are both '{source}'"),
            ));
        }

        let recipient = inputs
            .get(Self::PORT_RECIPIENT)
            .and_then(|v| v.as_str())
            .unwrap_or("self");
        let transfer_id = uuid::Uuid::new_v4();

        log::info!(
            "Bridging {} from {} to {} (transfer {})",
            amount,
            source,
            destination,
            transfer_id
        );

        let mut outputs = Outputs::new();
        outputs.insert(
            Self::PORT_TRANSACTION.to_string(),
            serde_json::json!({
                "chain": source,
                "kind": "lock",
                "amount": amount,
                "transferId": transfer_id.to_string(),
                "simulated": true,
            }),
        );
        outputs.insert(
            Self::PORT_DESTINATION_TX.to_string(),
            serde_json::json!({
                "chain": destination,
                "kind": "release",
                "amount": amount,
                "recipient": recipient,
                "transferId": transfer_id.to_string(),
                "simulated": true,
            }),
        );
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(BridgeTransfer)));
