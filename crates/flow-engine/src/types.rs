//! Core types for workflow graphs and component definitions
//!
//! These types define the structure of workflow graphs (nodes, connections,
//! ports) and the metadata a registered component exposes: typed input and
//! output ports, a configuration field schema, and executor metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier for a node instance within a workflow
pub type NodeId = String;

/// Unique identifier for a connection
pub type ConnectionId = String;

/// Unique identifier for a port
pub type PortId = String;

/// Unique identifier for a registered component type
pub type ComponentId = String;

/// The data type of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortDataType {
    /// Accepts any type
    Any,
    /// Text string
    String,
    /// Numeric value
    Number,
    /// Boolean value
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// Blockchain account address (0x-prefixed hex)
    Address,
    /// Token descriptor (symbol + contract address)
    Token,
    /// Token amount in human-readable units
    TokenAmount,
    /// Swap quote from an aggregator
    Quote,
    /// Signed or unsigned transaction payload
    Transaction,
    /// Connected wallet session
    Wallet,
    /// Chain identifier
    Chain,
}

impl PortDataType {
    /// Check if this type can connect to another type without coercion.
    ///
    /// `Any` is compatible with everything in both directions; all other
    /// pairs require an exact match. Implicit coercions live in the
    /// connection validator's conversion table, not here.
    pub fn is_compatible_with(&self, other: &PortDataType) -> bool {
        if matches!(self, PortDataType::Any) || matches!(other, PortDataType::Any) {
            return true;
        }
        self == other
    }
}

impl std::fmt::Display for PortDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PortDataType::Any => "any",
            PortDataType::String => "string",
            PortDataType::Number => "number",
            PortDataType::Boolean => "boolean",
            PortDataType::Object => "object",
            PortDataType::Array => "array",
            PortDataType::Address => "address",
            PortDataType::Token => "token",
            PortDataType::TokenAmount => "tokenAmount",
            PortDataType::Quote => "quote",
            PortDataType::Transaction => "transaction",
            PortDataType::Wallet => "wallet",
            PortDataType::Chain => "chain",
        };
        write!(f, "{}", name)
    }
}

/// Definition of a port (input or output)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDefinition {
    /// Unique identifier for this port
    pub id: PortId,
    /// Human-readable label
    pub label: String,
    /// Data type of the port
    pub data_type: PortDataType,
    /// Whether this port is required (for inputs)
    pub required: bool,
}

impl PortDefinition {
    /// Create a required port
    pub fn required(
        id: impl Into<String>,
        label: impl Into<String>,
        data_type: PortDataType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data_type,
            required: true,
        }
    }

    /// Create an optional port
    pub fn optional(
        id: impl Into<String>,
        label: impl Into<String>,
        data_type: PortDataType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data_type,
            required: false,
        }
    }
}

/// Category of a component, used for palette grouping in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentCategory {
    /// Wallet connection and account components
    Wallet,
    /// DeFi protocol components (swaps, quotes, token selection)
    DeFi,
    /// Cross-chain bridge components
    Bridge,
    /// Control flow components (conditionals, delays)
    Logic,
    /// Data transformation components
    Data,
    /// Presentation components (dashboards)
    Display,
}

/// Type of a configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigFieldType {
    /// Free-form text
    Text,
    /// Numeric input
    Number,
    /// Checkbox
    Boolean,
    /// One of a fixed set of options
    Select,
    /// Sensitive text (API keys), masked in the UI and never logged
    Secret,
}

/// Descriptor for one user-configurable field on a component
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigField {
    /// Canonical key (camelCase) under which the value is stored
    pub key: String,
    /// Human-readable label
    pub label: String,
    /// Field type
    pub field_type: ConfigFieldType,
    /// Whether the user must supply a value
    pub required: bool,
    /// Default used when the user leaves the field empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Options for `Select` fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Whether the value is sensitive (masked, excluded from exports)
    #[serde(default)]
    pub sensitive: bool,
}

impl ConfigField {
    /// Create a new config field
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        field_type: ConfigFieldType,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            required: false,
            default_value: None,
            options: Vec::new(),
            sensitive: false,
        }
    }

    /// Mark this field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set a default value
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Set the options for a `Select` field
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Mark this field as sensitive
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// How a component's executor runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutorKind {
    /// Runs in-process with no external calls
    Local,
    /// Calls an external HTTP API
    Http,
}

/// Executor metadata for a component
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorSpec {
    /// Execution kind
    pub kind: ExecutorKind,
    /// Per-node timeout enforced by the engine
    pub timeout_ms: u64,
    /// API endpoint, where applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ExecutorSpec {
    /// Default timeout applied when a component does not declare one
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

    /// Local executor with the default timeout
    pub fn local() -> Self {
        Self {
            kind: ExecutorKind::Local,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            endpoint: None,
        }
    }

    /// HTTP executor against the given endpoint
    pub fn http(endpoint: impl Into<String>) -> Self {
        Self {
            kind: ExecutorKind::Http,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            endpoint: Some(endpoint.into()),
        }
    }

    /// Override the timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Definition of a component type: everything the UI needs to render a
/// palette entry and the engine needs to validate and run a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Unique type identifier (e.g., "oneInchSwap")
    pub id: ComponentId,
    /// Category for palette grouping
    pub category: ComponentCategory,
    /// Human-readable label
    pub label: String,
    /// Description of what the component does
    pub description: String,
    /// Input port definitions, in declaration order
    pub inputs: Vec<PortDefinition>,
    /// Output port definitions, in declaration order
    pub outputs: Vec<PortDefinition>,
    /// Configuration field schema
    pub configuration: Vec<ConfigField>,
    /// Executor metadata
    pub executor: ExecutorSpec,
}

impl ComponentDefinition {
    /// Find an input port by id
    pub fn input(&self, port_id: &str) -> Option<&PortDefinition> {
        self.inputs.iter().find(|p| p.id == port_id)
    }

    /// Find an output port by id
    pub fn output(&self, port_id: &str) -> Option<&PortDefinition> {
        self.outputs.iter().find(|p| p.id == port_id)
    }

    /// Find a configuration field by key
    pub fn config_field(&self, key: &str) -> Option<&ConfigField> {
        self.configuration.iter().find(|f| f.key == key)
    }
}

/// One placed instance of a component in a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique identifier within the workflow
    pub id: NodeId,
    /// Component type (foreign key into the registry)
    pub component_id: ComponentId,
    /// User-supplied configuration values, keyed by field key
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
    /// Canvas position (x, y); presentation only, ignored by the engine
    #[serde(default)]
    pub position: (f64, f64),
}

/// A directed link from one node's output port to another node's input port
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConnection {
    /// Unique identifier for this connection
    pub id: ConnectionId,
    /// Source node ID
    pub source: NodeId,
    /// Source output port ID
    pub source_port: PortId,
    /// Target node ID
    pub target: NodeId,
    /// Target input port ID
    pub target_port: PortId,
}

/// A complete workflow graph, treated as an immutable snapshot per execution run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Unique identifier for this workflow
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Node instances
    pub nodes: Vec<WorkflowNode>,
    /// Connections between nodes
    pub connections: Vec<WorkflowConnection>,
}

impl WorkflowDefinition {
    /// Create a new empty workflow
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Connections coming into a node
    pub fn incoming_connections<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowConnection> + 'a {
        self.connections.iter().filter(move |c| c.target == node_id)
    }

    /// Connections going out of a node
    pub fn outgoing_connections<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowConnection> + 'a {
        self.connections.iter().filter(move |c| c.source == node_id)
    }

    /// IDs of nodes this node depends on (upstream)
    pub fn dependencies(&self, node_id: &str) -> Vec<NodeId> {
        self.incoming_connections(node_id)
            .map(|c| c.source.clone())
            .collect()
    }

    /// IDs of nodes that depend on this node (downstream)
    pub fn dependents(&self, node_id: &str) -> Vec<NodeId> {
        self.outgoing_connections(node_id)
            .map(|c| c.target.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_data_type_compatibility() {
        assert!(PortDataType::Any.is_compatible_with(&PortDataType::Address));
        assert!(PortDataType::Address.is_compatible_with(&PortDataType::Any));
        assert!(PortDataType::Token.is_compatible_with(&PortDataType::Token));
        assert!(!PortDataType::Transaction.is_compatible_with(&PortDataType::Boolean));
        assert!(!PortDataType::Number.is_compatible_with(&PortDataType::String));
    }

    #[test]
    fn test_workflow_graph_helpers() {
        let mut workflow = WorkflowDefinition::new("wf", "Test");
        workflow.nodes.push(WorkflowNode {
            id: "wallet-1".to_string(),
            component_id: "walletConnector".to_string(),
            config: HashMap::new(),
            position: (0.0, 0.0),
        });
        workflow.nodes.push(WorkflowNode {
            id: "swap-1".to_string(),
            component_id: "oneInchSwap".to_string(),
            config: HashMap::new(),
            position: (200.0, 0.0),
        });
        workflow.connections.push(WorkflowConnection {
            id: "conn-1".to_string(),
            source: "wallet-1".to_string(),
            source_port: "address".to_string(),
            target: "swap-1".to_string(),
            target_port: "fromAddress".to_string(),
        });

        assert_eq!(workflow.dependencies("swap-1"), vec!["wallet-1"]);
        assert_eq!(workflow.dependents("wallet-1"), vec!["swap-1"]);
        assert!(workflow.find_node("wallet-1").is_some());
        assert!(workflow.find_node("missing").is_none());
    }

    #[test]
    fn test_config_field_builders() {
        let field = ConfigField::new("slippage", "Slippage %", ConfigFieldType::Number)
            .with_default(serde_json::json!(1.0));
        assert!(!field.required);
        assert_eq!(field.default_value, Some(serde_json::json!(1.0)));

        let secret = ConfigField::new("apiKey", "API Key", ConfigFieldType::Secret)
            .required()
            .sensitive();
        assert!(secret.required);
        assert!(secret.sensitive);
    }

    #[test]
    fn test_component_definition_lookups() {
        let definition = ComponentDefinition {
            id: "test".to_string(),
            category: ComponentCategory::DeFi,
            label: "Test".to_string(),
            description: "Test component".to_string(),
            inputs: vec![PortDefinition::required(
                "amount",
                "Amount",
                PortDataType::TokenAmount,
            )],
            outputs: vec![PortDefinition::optional(
                "quote",
                "Quote",
                PortDataType::Quote,
            )],
            configuration: vec![ConfigField::new("chain", "Chain", ConfigFieldType::Text)],
            executor: ExecutorSpec::local(),
        };

        assert!(definition.input("amount").is_some());
        assert!(definition.input("quote").is_none());
        assert!(definition.output("quote").is_some());
        assert!(definition.config_field("chain").is_some());
    }

    #[test]
    fn test_serde_camel_case() {
        let connection = WorkflowConnection {
            id: "c1".to_string(),
            source: "a".to_string(),
            source_port: "out".to_string(),
            target: "b".to_string(),
            target_port: "in".to_string(),
        };
        let json = serde_json::to_string(&connection).unwrap();
        assert!(json.contains("sourcePort"));
        assert!(json.contains("targetPort"));
    }
}
