//! Delay component
//!
//! Passes its input through after a configured pause. Useful between a
//! swap and a balance read, where chain state needs a moment to settle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition, Result,
};

/// Passthrough after a configured pause
#[derive(Default)]
pub struct Delay;

impl Delay {
    pub const ID: &'static str = "delay";
    pub const PORT_VALUE: &'static str = "value";

    /// Upper bound keeps a misconfigured node from pinning a run until
    /// the executor timeout fires
    const MAX_DELAY_MS: u64 = 25_000;
}

#[async_trait]
impl Component for Delay {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::Logic,
            label: "Delay".to_string(),
            description: "Waits before passing its input through".to_string(),
            inputs: vec![PortDefinition::optional(
                Self::PORT_VALUE,
                "Value",
                PortDataType::Any,
            )],
            outputs: vec![PortDefinition::optional(
                Self::PORT_VALUE,
                "Value",
                PortDataType::Any,
            )],
            configuration: vec![ConfigField::new(
                "durationMs",
                "Duration (ms)",
                ConfigFieldType::Number,
            )
            .with_default(serde_json::json!(1000))],
            executor: ExecutorSpec::local(),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        let duration_ms = crate::config_f64(&config, "durationMs")
            .map(|ms| ms.max(0.0) as u64)
            .unwrap_or(1000)
            .min(Self::MAX_DELAY_MS);

        log::debug!("Delaying {}ms", duration_ms);
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;

        let mut outputs = Outputs::new();
        if let Some(value) = inputs.get(Self::PORT_VALUE) {
            outputs.insert(Self::PORT_VALUE.to_string(), value.clone());
        }
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(Delay)));

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_passes_value_through_after_pause() {
        let mut inputs = Inputs::new();
        inputs.insert("value".to_string(), serde_json::json!(42));
        let mut config = Config::new();
        config.insert("durationMs".to_string(), serde_json::json!(20));

        let started = Instant::now();
        let outputs = Delay.execute(inputs, config).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(outputs.get("value").unwrap(), &serde_json::json!(42));
    }

    #[tokio::test]
    async fn test_no_input_yields_no_output() {
        let mut config = Config::new();
        config.insert("durationMs".to_string(), serde_json::json!(1));

        let outputs = Delay.execute(Inputs::new(), config).await.unwrap();
        assert!(outputs.is_empty());
    }
}
