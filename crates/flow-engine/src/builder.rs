//! Fluent builder for constructing workflow definitions in code
//!
//! Primarily for tests and embedding hosts; the canvas UI ships complete
//! `WorkflowDefinition` JSON instead.

use crate::types::{WorkflowConnection, WorkflowDefinition, WorkflowNode};

/// Builds a `WorkflowDefinition` incrementally
///
/// ```
/// use flow_engine::builder::WorkflowBuilder;
///
/// let workflow = WorkflowBuilder::new("wf-1", "Swap flow")
///     .add_node("wallet-1", "walletConnector")
///     .add_node("swap-1", "oneInchSwap")
///     .with_config("slippage", serde_json::json!(0.5))
///     .connect("wallet-1", "address", "swap-1", "walletAddress")
///     .build();
///
/// assert_eq!(workflow.nodes.len(), 2);
/// assert_eq!(workflow.connections[0].id, "conn-1");
/// ```
pub struct WorkflowBuilder {
    workflow: WorkflowDefinition,
    next_connection: usize,
}

impl WorkflowBuilder {
    /// Start a new workflow with the given id and display name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            workflow: WorkflowDefinition::new(id, name),
            next_connection: 1,
        }
    }

    /// Add a node of the given component type
    pub fn add_node(mut self, id: impl Into<String>, component_id: impl Into<String>) -> Self {
        self.workflow.nodes.push(WorkflowNode {
            id: id.into(),
            component_id: component_id.into(),
            config: Default::default(),
            position: (0.0, 0.0),
        });
        self
    }

    /// Set a configuration value on the most recently added node
    pub fn with_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        if let Some(node) = self.workflow.nodes.last_mut() {
            node.config.insert(key.into(), value);
        }
        self
    }

    /// Set the canvas position of the most recently added node
    pub fn at(mut self, x: f64, y: f64) -> Self {
        if let Some(node) = self.workflow.nodes.last_mut() {
            node.position = (x, y);
        }
        self
    }

    /// Connect a source node's output port to a target node's input port.
    ///
    /// Connection ids are assigned automatically (`conn-1`, `conn-2`, ...).
    pub fn connect(
        mut self,
        source: impl Into<String>,
        source_port: impl Into<String>,
        target: impl Into<String>,
        target_port: impl Into<String>,
    ) -> Self {
        let id = format!("conn-{}", self.next_connection);
        self.next_connection += 1;
        self.workflow.connections.push(WorkflowConnection {
            id,
            source: source.into(),
            source_port: source_port.into(),
            target: target.into(),
            target_port: target_port.into(),
        });
        self
    }

    /// Finish and return the workflow definition
    pub fn build(self) -> WorkflowDefinition {
        self.workflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_assembles_graph() {
        let workflow = WorkflowBuilder::new("wf-1", "Test")
            .add_node("a", "walletConnector")
            .at(100.0, 50.0)
            .add_node("b", "tokenSelector")
            .with_config("chainId", serde_json::json!(1))
            .connect("a", "address", "b", "walletAddress")
            .build();

        assert_eq!(workflow.id, "wf-1");
        assert_eq!(workflow.nodes.len(), 2);
        assert_eq!(workflow.nodes[0].position, (100.0, 50.0));
        assert_eq!(
            workflow.nodes[1].config.get("chainId").unwrap(),
            &serde_json::json!(1)
        );
        assert_eq!(workflow.connections.len(), 1);
        assert_eq!(workflow.connections[0].source_port, "address");
    }

    #[test]
    fn test_connection_ids_are_sequential() {
        let workflow = WorkflowBuilder::new("wf", "Ids")
            .add_node("a", "x")
            .add_node("b", "x")
            .add_node("c", "x")
            .connect("a", "out", "b", "in")
            .connect("b", "out", "c", "in")
            .build();

        let ids: Vec<&str> = workflow.connections.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["conn-1", "conn-2"]);
    }
}
