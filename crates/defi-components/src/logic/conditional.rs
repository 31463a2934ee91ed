//! Conditional component
//!
//! Routes a value to one of two outputs based on a boolean input. Only
//! the taken branch port appears in the outputs, so downstream nodes on
//! the untaken branch receive nothing.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, EngineError,
    ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition, Result,
};

/// Routes a value to the true or false branch
#[derive(Default)]
pub struct Conditional;

impl Conditional {
    pub const ID: &'static str = "conditional";
    pub const PORT_CONDITION: &'static str = "condition";
    pub const PORT_VALUE: &'static str = "value";
    pub const PORT_TRUE: &'static str = "trueOut";
    pub const PORT_FALSE: &'static str = "falseOut";
}

#[async_trait]
impl Component for Conditional {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::Logic,
            label: "Conditional".to_string(),
            description: "Routes a value based on a boolean condition".to_string(),
            inputs: vec![
                PortDefinition::required(Self::PORT_CONDITION, "Condition", PortDataType::Boolean),
                PortDefinition::optional(Self::PORT_VALUE, "Value", PortDataType::Any),
            ],
            outputs: vec![
                PortDefinition::optional(Self::PORT_TRUE, "If True", PortDataType::Any),
                PortDefinition::optional(Self::PORT_FALSE, "If False", PortDataType::Any),
            ],
            configuration: vec![],
            executor: ExecutorSpec::local(),
        }
    }

    async fn execute(&self, inputs: Inputs, _config: Config) -> Result<Outputs> {
        let condition = inputs
            .get(Self::PORT_CONDITION)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| {
                EngineError::node_failed(Self::ID, "Input 'condition' is missing or not a boolean")
            })?;

        let value = inputs
            .get(Self::PORT_VALUE)
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        let port = if condition { Self::PORT_TRUE } else { Self::PORT_FALSE };
        log::debug!("Conditional routed to '{}'", port);

        let mut outputs = Outputs::new();
        outputs.insert(port.to_string(), value);
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(Conditional)));

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_routes_true_branch() {
        let mut inputs = Inputs::new();
        inputs.insert("condition".to_string(), serde_json::json!(true));
        inputs.insert("value".to_string(), serde_json::json!("payload"));

        let outputs = Conditional.execute(inputs, Config::new()).await.unwrap();
        assert_eq!(outputs.get("trueOut").unwrap(), "payload");
        assert!(!outputs.contains_key("falseOut"));
    }

    #[tokio::test]
    async fn test_routes_false_branch() {
        let mut inputs = Inputs::new();
        inputs.insert("condition".to_string(), serde_json::json!(false));

        let outputs = Conditional.execute(inputs, Config::new()).await.unwrap();
        assert!(outputs.contains_key("falseOut"));
        assert!(!outputs.contains_key("trueOut"));
    }

    #[tokio::test]
    async fn test_non_boolean_condition_fails() {
        let mut inputs = Inputs::new();
        inputs.insert("condition".to_string(), serde_json::json!("yes"));

        let err = Conditional.execute(inputs, Config::new()).await.unwrap_err();
        assert!(err.to_string().contains("boolean"));
    }
}
