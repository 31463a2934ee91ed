//! Connection validation
//!
//! Decides edge admissibility between two typed ports before the edge is
//! added to the graph, and provides a workflow pre-flight check used by
//! the import path. Cycle rejection is the execution engine's job, not the
//! validator's; self-loops pass through here untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::registry::ComponentRegistry;
use crate::types::{ComponentId, PortDataType, PortId, WorkflowDefinition};

/// Outcome of a connection check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCheck {
    /// Whether the connection is allowed (cleanly or with transformation)
    pub can_connect: bool,
    /// Whether an automatic data transformation will occur at execution time
    pub requires_transformation: bool,
    /// Human-readable warnings (e.g., describing a coercion)
    pub warnings: Vec<String>,
    /// Human-readable errors when the connection is rejected
    pub errors: Vec<String>,
}

impl ConnectionCheck {
    fn clean() -> Self {
        Self {
            can_connect: true,
            requires_transformation: false,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn with_transformation(warning: String) -> Self {
        Self {
            can_connect: true,
            requires_transformation: true,
            warnings: vec![warning],
            errors: Vec::new(),
        }
    }

    fn rejected(error: String) -> Self {
        Self {
            can_connect: false,
            requires_transformation: false,
            warnings: Vec::new(),
            errors: vec![error],
        }
    }
}

/// Fixed table of known-safe implicit conversions.
///
/// Returns a description of the coercion that will occur at execution
/// time, or `None` when no conversion path exists.
fn implicit_conversion(source: PortDataType, target: PortDataType) -> Option<&'static str> {
    use PortDataType::*;
    match (source, target) {
        (Number, String) => Some("number will be formatted as a string"),
        (Boolean, String) => Some("boolean will be formatted as a string"),
        (Address, String) => Some("address will be passed as its hex string"),
        (Chain, Number) => Some("chain id will be passed as its numeric id"),
        (Token, Object) => Some("token descriptor will be passed as a plain object"),
        (Quote, Object) => Some("quote will be passed as a plain object"),
        (Transaction, Object) => Some("transaction will be passed as a plain object"),
        (Wallet, Address) => Some("wallet session will be reduced to its account address"),
        (Number, TokenAmount) => Some("number will be treated as a token amount"),
        (TokenAmount, Number) => Some("token amount will be passed as a raw number"),
        (TokenAmount, String) => Some("token amount will be formatted as a string"),
        _ => None,
    }
}

/// Check whether a source port type may feed a target port type.
///
/// Pure and deterministic: the same `(source, target)` pair always yields
/// the same `(can_connect, requires_transformation)` outcome.
pub fn check_types(source: PortDataType, target: PortDataType) -> ConnectionCheck {
    if source.is_compatible_with(&target) {
        return ConnectionCheck::clean();
    }

    if let Some(coercion) = implicit_conversion(source, target) {
        return ConnectionCheck::with_transformation(format!(
            "Connecting {} to {}: {}",
            source, target, coercion
        ));
    }

    ConnectionCheck::rejected(format!(
        "Cannot connect {} to {}: no conversion path exists",
        source, target
    ))
}

/// Apply the implicit conversion an admitted type-mismatched edge calls
/// for, transforming the source port's value into the shape the target
/// port expects.
///
/// Mirrors [`implicit_conversion`] pair for pair. Pairs whose JSON
/// representations already coincide (address as hex string, token or
/// quote as a plain object) pass through unchanged, as does any value
/// that does not have the shape its source type promises; the component
/// reports the malformed input.
pub fn coerce_value(
    source: PortDataType,
    target: PortDataType,
    value: &serde_json::Value,
) -> serde_json::Value {
    use serde_json::Value;
    use PortDataType::*;
    match (source, target) {
        (Number, String) | (Number, TokenAmount) => match value {
            Value::Number(n) => Value::String(n.to_string()),
            _ => value.clone(),
        },
        (Boolean, String) => match value {
            Value::Bool(b) => Value::String(b.to_string()),
            _ => value.clone(),
        },
        (TokenAmount, Number) => match value.as_str().and_then(|s| s.parse::<f64>().ok()) {
            Some(parsed) => serde_json::Number::from_f64(parsed)
                .map(Value::Number)
                .unwrap_or_else(|| value.clone()),
            None => value.clone(),
        },
        (Chain, Number) => match value {
            Value::Object(map) => map.get("id").cloned().unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        },
        (Wallet, Address) => match value {
            Value::Object(map) => map
                .get("address")
                .cloned()
                .unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

/// A proposed edge, identified by component types and port ids.
///
/// The validator resolves the declared port types through the registry;
/// node identity is irrelevant here (self-loops are the engine's concern).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProposal {
    /// Component type of the source node
    pub source_component: ComponentId,
    /// Output port on the source component
    pub source_port: PortId,
    /// Component type of the target node
    pub target_component: ComponentId,
    /// Input port on the target component
    pub target_port: PortId,
}

/// Registry-aware connection validator
pub struct ConnectionValidator<'a> {
    registry: &'a ComponentRegistry,
}

impl<'a> ConnectionValidator<'a> {
    /// Create a validator over the given registry
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Validate a proposed connection.
    ///
    /// Unknown components or ports produce a rejected check naming the
    /// missing piece; otherwise the declared port types are compared via
    /// `check_types`. No side effects, no retries.
    pub fn validate(&self, proposal: &ConnectionProposal) -> ConnectionCheck {
        let source = match self.registry.definition(&proposal.source_component) {
            Some(definition) => definition,
            None => {
                return ConnectionCheck::rejected(format!(
                    "Unknown component '{}'",
                    proposal.source_component
                ))
            }
        };
        let target = match self.registry.definition(&proposal.target_component) {
            Some(definition) => definition,
            None => {
                return ConnectionCheck::rejected(format!(
                    "Unknown component '{}'",
                    proposal.target_component
                ))
            }
        };

        let source_port = match source.output(&proposal.source_port) {
            Some(port) => port,
            None => {
                return ConnectionCheck::rejected(format!(
                    "Component '{}' has no output port '{}'",
                    source.id, proposal.source_port
                ))
            }
        };
        let target_port = match target.input(&proposal.target_port) {
            Some(port) => port,
            None => {
                return ConnectionCheck::rejected(format!(
                    "Component '{}' has no input port '{}'",
                    target.id, proposal.target_port
                ))
            }
        };

        check_types(source_port.data_type, target_port.data_type)
    }
}

/// Validation error with location context
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// A node references a component id not present in the registry
    UnknownComponent { node_id: String, component_id: String },
    /// A connection references a non-existent node
    UnknownNode { connection_id: String, node_id: String },
    /// A connection references a port its component does not declare
    UnknownPort {
        connection_id: String,
        component_id: String,
        port_id: String,
    },
    /// A connection links incompatible port types
    IncompatiblePortTypes {
        connection_id: String,
        source_type: PortDataType,
        target_type: PortDataType,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownComponent { node_id, component_id } => {
                write!(
                    f,
                    "Unknown component '{}' for node '{}'",
                    component_id, node_id
                )
            }
            Self::UnknownNode { connection_id, node_id } => {
                write!(
                    f,
                    "Connection '{}' references unknown node '{}'",
                    connection_id, node_id
                )
            }
            Self::UnknownPort {
                connection_id,
                component_id,
                port_id,
            } => {
                write!(
                    f,
                    "Connection '{}' references port '{}' not declared on component '{}'",
                    connection_id, port_id, component_id
                )
            }
            Self::IncompatiblePortTypes {
                connection_id,
                source_type,
                target_type,
            } => {
                write!(
                    f,
                    "Connection '{}' links incompatible types: {} -> {}",
                    connection_id, source_type, target_type
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Pre-flight validation of a whole workflow.
///
/// Returns all errors found (not just the first). Used by the import path
/// so a malformed graph never reaches the execution engine.
pub fn validate_workflow(
    workflow: &WorkflowDefinition,
    registry: &ComponentRegistry,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let node_ids: HashSet<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();

    for node in &workflow.nodes {
        if !registry.contains(&node.component_id) {
            errors.push(ValidationError::UnknownComponent {
                node_id: node.id.clone(),
                component_id: node.component_id.clone(),
            });
        }
    }

    for connection in &workflow.connections {
        let mut nodes_ok = true;
        for endpoint in [&connection.source, &connection.target] {
            if !node_ids.contains(endpoint.as_str()) {
                errors.push(ValidationError::UnknownNode {
                    connection_id: connection.id.clone(),
                    node_id: endpoint.clone(),
                });
                nodes_ok = false;
            }
        }
        if !nodes_ok {
            continue;
        }

        // Both endpoints exist; resolve ports where the components are known
        let source_node = workflow.find_node(&connection.source);
        let target_node = workflow.find_node(&connection.target);
        let (Some(source_node), Some(target_node)) = (source_node, target_node) else {
            continue;
        };

        let source_def = registry.definition(&source_node.component_id);
        let target_def = registry.definition(&target_node.component_id);

        let source_type = source_def.as_ref().and_then(|d| {
            let port = d.output(&connection.source_port);
            if port.is_none() {
                errors.push(ValidationError::UnknownPort {
                    connection_id: connection.id.clone(),
                    component_id: d.id.clone(),
                    port_id: connection.source_port.clone(),
                });
            }
            port.map(|p| p.data_type)
        });
        let target_type = target_def.as_ref().and_then(|d| {
            let port = d.input(&connection.target_port);
            if port.is_none() {
                errors.push(ValidationError::UnknownPort {
                    connection_id: connection.id.clone(),
                    component_id: d.id.clone(),
                    port_id: connection.target_port.clone(),
                });
            }
            port.map(|p| p.data_type)
        });

        if let (Some(source_type), Some(target_type)) = (source_type, target_type) {
            if !check_types(source_type, target_type).can_connect {
                errors.push(ValidationError::IncompatiblePortTypes {
                    connection_id: connection.id.clone(),
                    source_type,
                    target_type,
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::component::CallbackComponent;
    use crate::types::{
        ComponentCategory, ComponentDefinition, ExecutorSpec, PortDefinition,
    };
    use std::sync::Arc;

    fn make_registry() -> ComponentRegistry {
        let registry = ComponentRegistry::new();

        let swap = ComponentDefinition {
            id: "swap".to_string(),
            category: ComponentCategory::DeFi,
            label: "Swap".to_string(),
            description: "Swap".to_string(),
            inputs: vec![
                PortDefinition::required("amount", "Amount", PortDataType::TokenAmount),
                PortDefinition::optional("flag", "Flag", PortDataType::Boolean),
            ],
            outputs: vec![PortDefinition::optional(
                "transaction",
                "Transaction",
                PortDataType::Transaction,
            )],
            configuration: vec![],
            executor: ExecutorSpec::local(),
        };
        let display = ComponentDefinition {
            id: "display".to_string(),
            category: ComponentCategory::Display,
            label: "Display".to_string(),
            description: "Display".to_string(),
            inputs: vec![PortDefinition::optional("data", "Data", PortDataType::Any)],
            outputs: vec![],
            configuration: vec![],
            executor: ExecutorSpec::local(),
        };

        for definition in [swap, display] {
            registry
                .register(Arc::new(CallbackComponent::new(
                    definition,
                    |_inputs, _config| async { Ok(Default::default()) },
                )))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_exact_match_connects_cleanly() {
        let check = check_types(PortDataType::Token, PortDataType::Token);
        assert!(check.can_connect);
        assert!(!check.requires_transformation);
        assert!(check.warnings.is_empty());
    }

    #[test]
    fn test_any_connects_cleanly_both_directions() {
        for (source, target) in [
            (PortDataType::Any, PortDataType::Transaction),
            (PortDataType::Transaction, PortDataType::Any),
        ] {
            let check = check_types(source, target);
            assert!(check.can_connect);
            assert!(!check.requires_transformation);
        }
    }

    #[test]
    fn test_implicit_conversion_warns() {
        let check = check_types(PortDataType::Number, PortDataType::String);
        assert!(check.can_connect);
        assert!(check.requires_transformation);
        assert_eq!(check.warnings.len(), 1);
        assert!(check.warnings[0].contains("number"));
    }

    #[test]
    fn test_no_conversion_path_rejected() {
        let check = check_types(PortDataType::Transaction, PortDataType::Boolean);
        assert!(!check.can_connect);
        assert!(!check.requires_transformation);
        assert!(check.errors[0].contains("transaction"));
        assert!(check.errors[0].contains("boolean"));
    }

    #[test]
    fn test_check_types_is_deterministic() {
        let pairs = [
            (PortDataType::Number, PortDataType::String),
            (PortDataType::Transaction, PortDataType::Boolean),
            (PortDataType::Any, PortDataType::Quote),
        ];
        for (source, target) in pairs {
            let first = check_types(source, target);
            let second = check_types(source, target);
            assert_eq!(first.can_connect, second.can_connect);
            assert_eq!(first.requires_transformation, second.requires_transformation);
        }
    }

    #[test]
    fn test_coerce_number_into_token_amount() {
        let value = coerce_value(
            PortDataType::Number,
            PortDataType::TokenAmount,
            &serde_json::json!(2),
        );
        assert_eq!(value, serde_json::json!("2"));

        let value = coerce_value(
            PortDataType::Number,
            PortDataType::String,
            &serde_json::json!(1.5),
        );
        assert_eq!(value, serde_json::json!("1.5"));
    }

    #[test]
    fn test_coerce_token_amount_into_number() {
        let value = coerce_value(
            PortDataType::TokenAmount,
            PortDataType::Number,
            &serde_json::json!("123.45"),
        );
        assert_eq!(value, serde_json::json!(123.45));

        // Unparseable amounts pass through for the component to report
        let value = coerce_value(
            PortDataType::TokenAmount,
            PortDataType::Number,
            &serde_json::json!("lots"),
        );
        assert_eq!(value, serde_json::json!("lots"));
    }

    #[test]
    fn test_coerce_wallet_into_address() {
        let wallet = serde_json::json!({"address": "0xABC", "provider": "metamask"});
        let value = coerce_value(PortDataType::Wallet, PortDataType::Address, &wallet);
        assert_eq!(value, serde_json::json!("0xABC"));
    }

    #[test]
    fn test_coerce_same_representation_passes_through() {
        let token = serde_json::json!({"symbol": "ETH"});
        let value = coerce_value(PortDataType::Token, PortDataType::Object, &token);
        assert_eq!(value, token);

        let value = coerce_value(
            PortDataType::Address,
            PortDataType::String,
            &serde_json::json!("0xFEED"),
        );
        assert_eq!(value, serde_json::json!("0xFEED"));
    }

    #[test]
    fn test_validator_resolves_ports() {
        let registry = make_registry();
        let validator = ConnectionValidator::new(&registry);

        let check = validator.validate(&ConnectionProposal {
            source_component: "swap".to_string(),
            source_port: "transaction".to_string(),
            target_component: "display".to_string(),
            target_port: "data".to_string(),
        });
        assert!(check.can_connect);
    }

    #[test]
    fn test_validator_rejects_incompatible_ports() {
        let registry = make_registry();
        let validator = ConnectionValidator::new(&registry);

        // transaction -> boolean has no conversion path
        let check = validator.validate(&ConnectionProposal {
            source_component: "swap".to_string(),
            source_port: "transaction".to_string(),
            target_component: "swap".to_string(),
            target_port: "flag".to_string(),
        });
        assert!(!check.can_connect);
        assert!(!check.errors.is_empty());
    }

    #[test]
    fn test_validator_names_missing_port() {
        let registry = make_registry();
        let validator = ConnectionValidator::new(&registry);

        let check = validator.validate(&ConnectionProposal {
            source_component: "swap".to_string(),
            source_port: "nope".to_string(),
            target_component: "display".to_string(),
            target_port: "data".to_string(),
        });
        assert!(!check.can_connect);
        assert!(check.errors[0].contains("nope"));
    }

    #[test]
    fn test_validator_names_missing_component() {
        let registry = make_registry();
        let validator = ConnectionValidator::new(&registry);

        let check = validator.validate(&ConnectionProposal {
            source_component: "ghost".to_string(),
            source_port: "out".to_string(),
            target_component: "display".to_string(),
            target_port: "data".to_string(),
        });
        assert!(!check.can_connect);
        assert!(check.errors[0].contains("ghost"));
    }

    #[test]
    fn test_validate_workflow_collects_errors() {
        let registry = make_registry();
        let workflow = WorkflowBuilder::new("wf", "Broken")
            .add_node("a", "unknown-component")
            .add_node("b", "display")
            .connect("a", "out", "missing", "in")
            .build();

        let errors = validate_workflow(&workflow, &registry);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownComponent { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownNode { .. })));
    }

    #[test]
    fn test_validate_workflow_clean_graph() {
        let registry = make_registry();
        let workflow = WorkflowBuilder::new("wf", "Clean")
            .add_node("swap-1", "swap")
            .add_node("display-1", "display")
            .connect("swap-1", "transaction", "display-1", "data")
            .build();

        let errors = validate_workflow(&workflow, &registry);
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    #[test]
    fn test_validate_workflow_flags_bad_types() {
        let registry = make_registry();
        let workflow = WorkflowBuilder::new("wf", "Mismatched")
            .add_node("swap-1", "swap")
            .add_node("swap-2", "swap")
            .connect("swap-1", "transaction", "swap-2", "flag")
            .build();

        let errors = validate_workflow(&workflow, &registry);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::IncompatiblePortTypes { .. })));
    }
}
