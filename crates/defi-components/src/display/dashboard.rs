//! Dashboard component
//!
//! Terminal node that aggregates whatever is wired into it into a single
//! render payload. The canvas (and the generated app) reads the `panel`
//! output to draw the result card; the engine itself renders nothing.

use std::sync::Arc;

use async_trait::async_trait;
use flow_engine::{
    Component, ComponentCategory, ComponentCtor, ComponentDefinition, Config, ConfigField,
    ConfigFieldType, ExecutorSpec, Inputs, Outputs, PortDataType, PortDefinition, Result,
};

/// Aggregates inputs into a dashboard render payload
#[derive(Default)]
pub struct Dashboard;

impl Dashboard {
    pub const ID: &'static str = "dashboard";
    pub const PORT_PANEL: &'static str = "panel";
}

#[async_trait]
impl Component for Dashboard {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            id: Self::ID.to_string(),
            category: ComponentCategory::Display,
            label: "Dashboard".to_string(),
            description: "Displays workflow results".to_string(),
            inputs: vec![
                PortDefinition::optional("value1", "Value 1", PortDataType::Any),
                PortDefinition::optional("value2", "Value 2", PortDataType::Any),
                PortDefinition::optional("value3", "Value 3", PortDataType::Any),
            ],
            outputs: vec![PortDefinition::required(
                Self::PORT_PANEL,
                "Panel",
                PortDataType::Object,
            )],
            configuration: vec![ConfigField::new("title", "Title", ConfigFieldType::Text)
                .with_default(serde_json::json!("Dashboard"))],
            executor: ExecutorSpec::local(),
        }
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        let title = crate::config_str(&config, "title").unwrap_or("Dashboard");

        // Stable item order regardless of map iteration
        let mut keys: Vec<&String> = inputs.keys().collect();
        keys.sort();
        let items: Vec<serde_json::Value> = keys
            .into_iter()
            .map(|key| serde_json::json!({ "label": key, "value": inputs[key] }))
            .collect();

        log::debug!("Dashboard '{}' with {} items", title, items.len());

        let mut outputs = Outputs::new();
        outputs.insert(
            Self::PORT_PANEL.to_string(),
            serde_json::json!({ "title": title, "items": items }),
        );
        Ok(outputs)
    }
}

inventory::submit!(ComponentCtor(|| Arc::new(Dashboard)));

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_aggregates_wired_inputs_in_order() {
        let mut inputs = Inputs::new();
        inputs.insert("value2".to_string(), serde_json::json!("123.45"));
        inputs.insert("value1".to_string(), serde_json::json!("0xABC"));

        let outputs = Dashboard.execute(inputs, Config::new()).await.unwrap();
        let panel = outputs.get("panel").unwrap();
        assert_eq!(panel["title"], "Dashboard");
        assert_eq!(panel["items"][0]["label"], "value1");
        assert_eq!(panel["items"][1]["value"], "123.45");
    }

    #[tokio::test]
    async fn test_empty_panel_with_custom_title() {
        let mut config = Config::new();
        config.insert("title".to_string(), serde_json::json!("Swap Results"));

        let outputs = Dashboard.execute(Inputs::new(), config).await.unwrap();
        let panel = outputs.get("panel").unwrap();
        assert_eq!(panel["title"], "Swap Results");
        assert_eq!(panel["items"].as_array().unwrap().len(), 0);
    }
}
