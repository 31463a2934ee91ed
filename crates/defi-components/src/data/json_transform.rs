//! JSON Transform component
//!
//! Extracts a value from a JSON object by dot path (`tx.gas`, `items.0.id`).
//! A path that resolves to nothing yields `null` rather than failing the
//! run; wiring mistakes surface visibly in the dashboard instead of
//! aborting the workflow.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, EngineError, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition,
    Result,
};

/// Extracts a value from JSON by dot path
#[derive(Default)]
pub struct JsonTransform;

impl JsonTransform {
    pub const ID: &'static str = "jsonTransform";
    pub const PORT_DATA: &'static str = "data";
    pub const PORT_RESULT: &'static str = "result";
}

/// Walk `value` along a dot-separated path; numeric segments index arrays
fn extract<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match current {
            serde_json::Value::Object(map) => map.get(segment)?,
            serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[async_trait]
impl Component for JsonTransform {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::Data,
            label: "JSON Transform".to_string(),
            description: "Extracts a value from JSON by dot path".to_string(),
            inputs: vec![PortDefinition::required(
                Self::PORT_DATA,
                "Data",
                PortDataType::Object,
            )],
            outputs: vec![PortDefinition::optional(
                Self::PORT_RESULT,
                "Result",
                PortDataType::Any,
            )],
            configuration: vec![
                ConfigField::new("path", "Path", ConfigFieldType::Text).required(),
            ],
            executor: ExecutorSpec::local(),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        let data = inputs.get(Self::PORT_DATA).ok_or_else(|| {
            EngineError::node_failed(Self::ID, "Input 'data' is missing")
        })?;
        let path = crate::config_str(&config, "path").ok_or_else(|| {
            EngineError::node_failed(Self::ID, "Config 'path' is not set")
        })?;

        let result = extract(data, path).cloned().unwrap_or(serde_json::Value::Null);
        if result.is_null() {
            log::debug!("Path '{}' resolved to nothing", path);
        }

        let mut outputs = Outputs::new();
        outputs.insert(Self::PORT_RESULT.to_string(), result);
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(JsonTransform)));

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> serde_json::Value {
        serde_json::json!({
            "tx": { "gas": 21000, "logs": [{"topic": "0xT0"}, {"topic": "0xT1"}] }
        })
    }

    #[tokio::test]
    async fn test_extracts_nested_value() {
        let mut inputs = Inputs::new();
        inputs.insert("data".to_string(), data());
        let mut config = Config::new();
        config.insert("path".to_string(), serde_json::json!("tx.gas"));

        let outputs = JsonTransform.execute(inputs, config).await.unwrap();
        assert_eq!(outputs.get("result").unwrap(), &serde_json::json!(21000));
    }

    #[tokio::test]
    async fn test_array_index_segment() {
        let mut inputs = Inputs::new();
        inputs.insert("data".to_string(), data());
        let mut config = Config::new();
        config.insert("path".to_string(), serde_json::json!("tx.logs.1.topic"));

        let outputs = JsonTransform.execute(inputs, config).await.unwrap();
        assert_eq!(outputs.get("result").unwrap(), "0xT1");
    }

    #[tokio::test]
    async fn test_dead_path_yields_null() {
        let mut inputs = Inputs::new();
        inputs.insert("data".to_string(), data());
        let mut config = Config::new();
        config.insert("path".to_string(), serde_json::json!("tx.nope.deeper"));

        let outputs = JsonTransform.execute(inputs, config).await.unwrap();
        assert!(outputs.get("result").unwrap().is_null());
    }

    #[tokio::test]
    async fn test_missing_path_config_fails() {
        let mut inputs = Inputs::new();
        inputs.insert("data".to_string(), data());

        let err = JsonTransform.execute(inputs, Config::new()).await.unwrap_err();
        assert!(err.to_string().contains("path"));
    }
}
