//! Error types for the flow engine

use thiserror::Error;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the flow engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// A node references a component id with no registered definition
    #[error("Component '{component_id}' not found for node '{node_id}'")]
    ComponentNotFound {
        node_id: String,
        component_id: String,
    },

    /// Registering would overwrite an existing component in strict mode
    #[error("Component '{0}' is already registered")]
    DuplicateComponent(String),

    /// An edge between incompatible ports was attempted
    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    /// The workflow graph contains a cycle
    #[error("Workflow contains a cycle involving nodes: {}", nodes.join(", "))]
    CyclicWorkflow { nodes: Vec<String> },

    /// A component executor failed or returned an error outcome
    #[error("Node '{node_id}' failed: {message}")]
    NodeExecution { node_id: String, message: String },

    /// A component executor exceeded its declared timeout
    #[error("Node '{node_id}' timed out after {timeout_ms}ms")]
    Timeout { node_id: String, timeout_ms: u64 },

    /// The facade was used before `initialize()` completed
    #[error("Plugin system is not initialized")]
    NotInitialized,

    /// Execution was cancelled by the caller
    #[error("Execution cancelled")]
    Cancelled,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Create a node execution error
    pub fn node_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NodeExecution {
            node_id: node_id.into(),
            message: message.into(),
        }
    }

    /// Whether this error belongs to the validation class, raised before
    /// any node executes, never captured into a per-node result.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidConnection(_) | Self::CyclicWorkflow { .. } | Self::NotInitialized
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = EngineError::ComponentNotFound {
            node_id: "swap-1".to_string(),
            component_id: "oneInchSwap".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("swap-1"));
        assert!(msg.contains("oneInchSwap"));

        let err = EngineError::CyclicWorkflow {
            nodes: vec!["x".to_string(), "y".to_string()],
        };
        assert!(err.to_string().contains("x, y"));
    }

    #[test]
    fn test_validation_class() {
        assert!(EngineError::NotInitialized.is_validation());
        assert!(EngineError::CyclicWorkflow { nodes: vec![] }.is_validation());
        assert!(!EngineError::node_failed("n", "boom").is_validation());
        assert!(!EngineError::Timeout {
            node_id: "n".to_string(),
            timeout_ms: 1000
        }
        .is_validation());
    }
}
