//! 1inch Swap component
//!
//! Builds an unsigned swap transaction through the 1inch aggregator. The
//! engine never signs or broadcasts anything; the transaction payload is
//! handed downstream (typically to a dashboard or the generated app) for
//! the user's wallet to sign.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

use crate::client::OneInchClient;
use super::{parse_units, resolve_token, token_info};

/// Builds an unsigned swap transaction via 1inch
#[derive(Default)]
pub struct OneInchSwap;

impl OneInchSwap {
    pub const ID: &'static str = "oneInchSwap";
    pub const PORT_FROM: &'static str = "fromToken";
    pub const PORT_TO: &'static str = "toToken";
    pub const PORT_AMOUNT: &'static str = "amount";
    pub const PORT_FROM_ADDRESS: &'static str = "fromAddress";
    pub const PORT_TRANSACTION: &'static str = "transaction";
}

#[async_trait]
impl Component for OneInchSwap {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::DeFi,
            label: "1inch Swap".to_string(),
            description: "Builds an unsigned swap transaction via 1inch".to_string(),
            inputs: vec![
                PortDefinition::required(Self::PORT_FROM, "From Token", PortDataType::Token),
                PortDefinition::required(Self::PORT_TO, "To Token", PortDataType::Token),
                PortDefinition::required(Self::PORT_AMOUNT, "Amount", PortDataType::TokenAmount),
                PortDefinition::required(
                    Self::PORT_FROM_ADDRESS,
                    "From Address",
                    PortDataType::Address,
                ),
            ],
            outputs: vec![PortDefinition::required(
                Self::PORT_TRANSACTION,
                "Transaction",
                PortDataType::Transaction,
            )],
            configuration: vec![
                ConfigField::new("slippage", "Slippage %", ConfigFieldType::Number)
                    .with_default(serde_json::json!(1.0)),
                ConfigField::new("chainId", "Chain ID", ConfigFieldType::Number)
                    .with_default(serde_json::json!(1)),
                ConfigField::new("apiKey", "1inch API Key", ConfigFieldType::Secret).sensitive(),
            ],
            executor: ExecutorSpec::http("https://api.1inch.dev/swap").with_timeout_ms(15_000),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        let (from_symbol, from_token) = inputs
            .get(Self::PORT_FROM)
            .and_then(resolve_token)
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'fromToken' is missing or not a token")
            })?;
        let (to_symbol, to_token) = inputs
            .get(Self::PORT_TO)
            .and_then(resolve_token)
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'toToken' is missing or not a token")
            })?;
        let amount = inputs
            .get(Self::PORT_AMOUNT)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'amount' is missing or not a string")
            })?;
        let from_address = inputs
            .get(Self::PORT_FROM_ADDRESS)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'fromAddress' is missing")
            })?;

        let slippage = crate::config_f64(&config, "slippage").unwrap_or(1.0);
        if !(0.0..=50.0).contains(&slippage) {
            return Err(EngineError::node_failed(
                Self::ID,
                format!("Slippage {slippage}% is out of range (0-50)"),
            ));
        }

        let transaction = if crate::is_mainnet(&config) {
            let from_decimals = token_info(&from_symbol).map(|t| t.decimals).unwrap_or(18);
            let raw_amount = parse_units(amount, from_decimals).ok_or_else(|| {
                EngineError::node_failed(Self::ID, format!("Invalid amount '{amount}'"))
            })?;

            let chain_id = crate::config_f64(&config, "chainId").unwrap_or(1.0) as u64;
            let client =
                OneInchClient::new(crate::config_str(&config, "apiKey").map(String::from));
            let swap = client
                .swap(
                    chain_id,
                    &from_token,
                    &to_token,
                    &raw_amount,
                    from_address,
                    slippage,
                )
                .await
                .map_err(|e| EngineError::node_failed(Self::ID, e.to_string()))?;

            serde_json::json!({
                "from": swap.tx.from,
                "to": swap.tx.to,
                "data": swap.tx.data,
                "value": swap.tx.value,
                "gas": swap.tx.gas,
                "dstAmount": swap.dst_amount,
            })
        } else {
            log::debug!(
                "Simulating swap of {} {} -> {} for {}",
                amount,
                from_symbol,
                to_symbol,
                from_address
            );
            serde_json::json!({
                "from": from_address,
                "to": "0x1inchAggregationRouterV6Simulated",
                "data": format!("0xswap:{from_symbol}:{to_symbol}:{amount}"),
                "value": "0",
                "gas": 250_000,
                "simulated": true,
            })
        };

        let mut outputs = Outputs::new();
        outputs.insert(Self::PORT_TRANSACTION.to_string(), transaction);
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(OneInchSwap)));

#[cfg(test)]
mod tests {
    use super::*;

    fn swap_inputs() -> Inputs {
        let mut inputs = Inputs::new();
        inputs.insert("fromToken".to_string(), serde_json::json!({"symbol": "ETH"}));
        inputs.insert("toToken".to_string(), serde_json::json!({"symbol": "USDC"}));
        inputs.insert("amount".to_string(), serde_json::json!("1.5"));
        inputs.insert("fromAddress".to_string(), serde_json::json!("0xABC"));
        inputs
    }

    #[tokio::test]
    async fn test_simulated_swap_transaction() {
        let outputs = OneInchSwap.execute(swap_inputs(), Config::new()).await.unwrap();
        let tx = outputs.get("transaction").unwrap();
        assert_eq!(tx["from"], "0xABC");
        assert_eq!(tx["simulated"], true);
        assert!(tx["data"].as_str().unwrap().contains("ETH:USDC:1.5"));
    }

    #[tokio::test]
    async fn test_missing_required_input_fails() {
        let mut inputs = swap_inputs();
        inputs.remove("fromAddress");

        let err = OneInchSwap.execute(inputs, Config::new()).await.unwrap_err();
        assert!(err.to_string().contains("fromAddress"));
    }

    #[tokio::test]
    async fn test_slippage_out_of_range_fails() {
        let mut config = Config::new();
        config.insert("slippage".to_string(), serde_json::json!(75));

        let err = OneInchSwap.execute(swap_inputs(), config).await.unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
