//! Component capability trait
//!
//! A component is a registered, reusable node type. It self-describes its
//! metadata (typed ports, configuration schema, executor spec) and supplies
//! the opaque unit of work the engine runs when one of its nodes executes.
//! Concrete DeFi logic (1inch calls, bridge simulation) lives entirely
//! behind this seam.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ComponentDefinition;

/// Resolved values for a node's input ports, keyed by port id
pub type Inputs = HashMap<String, serde_json::Value>;

/// Resolved configuration values, keyed by field key
pub type Config = HashMap<String, serde_json::Value>;

/// Output values produced by a node, keyed by port id
pub type Outputs = HashMap<String, serde_json::Value>;

/// A pluggable component: metadata plus executor.
///
/// The engine treats `execute` as an opaque async operation with a single
/// success/failure outcome and a returned outputs mapping. Executors must
/// not assume any wall-clock relationship to sibling nodes beyond "all of
/// my declared upstream dependencies have already produced their outputs".
#[async_trait]
pub trait Component: Send + Sync {
    /// Static metadata for this component type
    fn definition(&self) -> ComponentDefinition;

    /// Run one node of this component type
    ///
    /// `inputs` holds values collected from connected upstream outputs;
    /// a port with no connection is simply absent. `config` is the node's
    /// user-supplied configuration merged over the declared field defaults.
    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs>;
}

type ExecuteFuture = Pin<Box<dyn std::future::Future<Output = Result<Outputs>> + Send>>;

/// Component backed by an async closure
///
/// Used for marketplace installs (where the executor arrives at runtime)
/// and as a test double.
pub struct CallbackComponent {
    definition: ComponentDefinition,
    callback: Box<dyn Fn(Inputs, Config) -> ExecuteFuture + Send + Sync>,
}

impl CallbackComponent {
    /// Create a component from a definition and an async callback
    pub fn new<F, Fut>(definition: ComponentDefinition, callback: F) -> Self
    where
        F: Fn(Inputs, Config) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Outputs>> + Send + 'static,
    {
        Self {
            definition,
            callback: Box::new(move |inputs, config| Box::pin(callback(inputs, config))),
        }
    }
}

#[async_trait]
impl Component for CallbackComponent {
    fn definition(&self) -> ComponentDefinition {
        self.definition.clone()
    }

    async fn execute(&self, inputs: Inputs, config: Config) -> Result<Outputs> {
        (self.callback)(inputs, config).await
    }
}

/// Link-time constructor for a built-in component.
///
/// Component crates submit one of these per built-in via
/// `inventory::submit!`; `ComponentRegistry::with_builtins` collects them.
pub struct ComponentCtor(pub fn() -> Arc<dyn Component>);

inventory::collect!(ComponentCtor);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ComponentCategory, ExecutorSpec, PortDataType, PortDefinition,
    };

    fn echo_definition() -> ComponentDefinition {
        ComponentDefinition {
            id: "echo".to_string(),
            category: ComponentCategory::Data,
            label: "Echo".to_string(),
            description: "Passes inputs through".to_string(),
            inputs: vec![PortDefinition::optional("value", "Value", PortDataType::Any)],
            outputs: vec![PortDefinition::optional("value", "Value", PortDataType::Any)],
            configuration: vec![],
            executor: ExecutorSpec::local(),
        }
    }

    #[tokio::test]
    async fn test_callback_component() {
        let component = CallbackComponent::new(echo_definition(), |inputs, _config| async move {
            Ok(inputs)
        });

        let mut inputs = Inputs::new();
        inputs.insert("value".to_string(), serde_json::json!("hello"));

        let outputs = component.execute(inputs, Config::new()).await.unwrap();
        assert_eq!(outputs.get("value").unwrap(), "hello");
        assert_eq!(component.definition().id, "echo");
    }

    #[tokio::test]
    async fn test_callback_component_error() {
        let component = CallbackComponent::new(echo_definition(), |_inputs, _config| async move {
            Err(crate::error::EngineError::node_failed("echo", "nope"))
        });

        let result = component.execute(Inputs::new(), Config::new()).await;
        assert!(result.is_err());
    }
}
