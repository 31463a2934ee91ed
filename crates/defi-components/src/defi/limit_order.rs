//! 1inch Limit Order component
//!
//! Assembles a limit order for the 1inch Limit Order Protocol. Order
//! placement is an EIP-712 signature produced by the user's wallet, so
//! the canvas never submits anything itself; this component builds the
//! order payload the generated app hands to the wallet for signing.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

use super::resolve_token;

const DEFAULT_EXPIRY_HOURS: f64 = 24.0;

/// Builds a 1inch limit order payload
#[derive(Default)]
pub struct LimitOrder;

impl LimitOrder {
    pub const ID: &'static str = "limitOrder";
    pub const PORT_FROM: &'static str = "fromToken";
    pub const PORT_TO: &'static str = "toToken";
    pub const PORT_AMOUNT: &'static str = "amount";
    pub const PORT_MAKER: &'static str = "fromAddress";
    pub const PORT_ORDER: &'static str = "order";
}

#[async_trait]
impl Component for LimitOrder {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::DeFi,
            label: "Limit Order".to_string(),
            description: "Creates a limit order for the 1inch Limit Order Protocol".to_string(),
            inputs: vec![
                PortDefinition::required(Self::PORT_FROM, "From Token", PortDataType::Token),
                PortDefinition::required(Self::PORT_TO, "To Token", PortDataType::Token),
                PortDefinition::required(Self::PORT_AMOUNT, "Amount", PortDataType::TokenAmount),
                PortDefinition::required(Self::PORT_MAKER, "Maker", PortDataType::Address),
            ],
            outputs: vec![PortDefinition::required(
                Self::PORT_ORDER,
                "Order",
                PortDataType::Object,
            )],
            configuration: vec![
                ConfigField::new("limitPrice", "Limit Price", ConfigFieldType::Text).required(),
                ConfigField::new("expiryHours", "Expiry (hours)", ConfigFieldType::Number)
                    .with_default(serde_json::json!(DEFAULT_EXPIRY_HOURS)),
            ],
            executor: ExecutorSpec::local(),
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
        let maker = inputs
            .get(Self::PORT_MAKER)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'fromAddress' is missing")
            })?;

        let amount = crate::config_f64(&inputs, Self::PORT_AMOUNT).ok_or_else(|| {
            EngineError::node_failed(Self::ID, "Input 'amount' is missing or not numeric")
        })?;
        if amount <= 0.0 {
            return Err(EngineError::node_failed(
                Self::ID,
                format!("Amount {amount} is not positive"),
            ));
        }

        let limit_price = crate::config_f64(&config, "limitPrice").ok_or_else(|| {
            EngineError::node_failed(Self::ID, "Config 'limitPrice' is missing or not numeric")
        })?;
        if limit_price <= 0.0 {
            return Err(EngineError::node_failed(
                Self::ID,
                format!("Limit price {limit_price} is not positive"),
            ));
        }

        let expiry_hours =
            crate::config_f64(&config, "expiryHours").unwrap_or(DEFAULT_EXPIRY_HOURS);
        let taking_amount = amount * limit_price;
        let order_id = uuid::Uuid::new_v4();

        log::info!(
            "Limit order {}: {} {} -> {} {} at {} (expires in {}h)",
            order_id,
            amount,
            from_symbol,
            taking_amount,
            to_symbol,
            limit_price,
            expiry_hours
        );

        let mut outputs = Outputs::new();
        outputs.insert(
            Self::PORT_ORDER.to_string(),
            serde_json::json!({
                "orderId": order_id.to_string(),
                "protocol": "1inch-limit-order",
                "maker": maker,
                "makerAsset": from_address,
                "takerAsset": to_address,
                "makingAmount": amount.to_string(),
                "takingAmount": taking_amount.to_string(),
                "limitPrice": limit_price.to_string(),
                "expiryHours": expiry_hours,
                "status": "unsigned",
            }),
        );
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(LimitOrder)));
