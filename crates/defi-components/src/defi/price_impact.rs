//! Price Impact Calculator component
//!
//! Estimates how much a trade moves the market price and flags trades
//! whose impact crosses the configured warning threshold. The estimate
//! uses a constant-depth pool model so canvases behave deterministically;
//! the generated app replaces it with live market depth.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

/// Simulated pool depth, in the traded token's own units
const SIMULATED_POOL_DEPTH: f64 = 10_000.0;

const DEFAULT_WARNING_THRESHOLD: f64 = 3.0;

/// Estimates price impact for a trade size
#[derive(Default)]
pub struct PriceImpactCalculator;

impl PriceImpactCalculator {
    pub const ID: &'static str = "priceImpactCalculator";
    pub const PORT_AMOUNT: &'static str = "amount";
    pub const PORT_QUOTE: &'static str = "quote";
    pub const PORT_IMPACT: &'static str = "priceImpact";
    pub const PORT_WARNING: &'static str = "warning";

    /// Impact in percent for a trade of `amount` against the pool model
    fn impact_percent(amount: f64) -> f64 {
        amount / (amount + SIMULATED_POOL_DEPTH) * 100.0
    }
}

#[async_trait]
impl Component for PriceImpactCalculator {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::DeFi,
            label: "Price Impact Calculator".to_string(),
            description: "Estimates price impact and warns on risky trade sizes".to_string(),
            inputs: vec![
                PortDefinition::required(Self::PORT_AMOUNT, "Amount", PortDataType::TokenAmount),
                PortDefinition::optional(Self::PORT_QUOTE, "Quote", PortDataType::TokenAmount),
            ],
            outputs: vec![
                PortDefinition::required(
                    Self::PORT_IMPACT,
                    "Price Impact %",
                    PortDataType::Number,
                ),
                PortDefinition::optional(Self::PORT_WARNING, "Warning", PortDataType::String),
            ],
            configuration: vec![ConfigField::new(
                "warningThreshold",
                "Warning Threshold %",
                ConfigFieldType::Number,
            )
            .with_default(serde_json::json!(DEFAULT_WARNING_THRESHOLD))],
            executor: ExecutorSpec::local(),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        let amount = crate::config_f64(&inputs, Self::PORT_AMOUNT).ok_or_else(|| {
            EngineError::node_failed(Self::ID, "Input 'amount' is missing or not numeric")
        })?;
        if amount < 0.0 {
            return Err(EngineError::node_failed(
                Self::ID,
                format!("Amount {amount} is negative"),
            ));
        }

        let threshold = crate::config_f64(&config, "warningThreshold")
            .unwrap_or(DEFAULT_WARNING_THRESHOLD);
        let impact = Self::impact_percent(amount);

        log::debug!(
            "Price impact for amount {}: {:.4}% (threshold {}%)",
            amount,
            impact,
            threshold
        );

        let mut outputs = Outputs::new();
        outputs.insert(Self::PORT_IMPACT.to_string(), serde_json::json!(impact));
        if impact > threshold {
            outputs.insert(
                Self::PORT_WARNING.to_string(),
                serde_json::json!(format!(
                    "Estimated price impact {impact:.2}% exceeds the {threshold}% threshold"
                )),
            );
        }
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(PriceImpactCalculator)));
