//! Workflow execution engine
//!
//! Given a workflow definition and initial external inputs, runs every
//! node exactly once in an order that respects data dependencies and
//! assembles a structured result. Per-node state machine:
//! `pending -> running -> (success | error)`; whole-workflow:
//! `pending -> running -> (completed | failed | cancelled)`.
//!
//! Failures are surfaced, never retried: downstream DeFi nodes commonly
//! depend on upstream transaction hashes/amounts that do not exist if an
//! earlier node failed, and retrying financial side effects would make
//! them non-auditable. First node error stops dispatch of unstarted nodes
//! (fail-fast); there is no rollback of completed nodes.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::component::{Config, Inputs, Outputs};
use crate::error::{EngineError, Result};
use crate::events::{EventSink, ExecutionEvent};
use crate::registry::ComponentRegistry;
use crate::types::{NodeId, PortId, WorkflowDefinition, WorkflowNode};
use crate::validation::coerce_value;

/// Execution environment a run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Environment {
    /// Live chain APIs
    Mainnet,
    /// Test networks / sandboxed APIs
    #[default]
    Testnet,
}

/// Cloneable handle for aborting an in-flight execution.
///
/// Cancellation takes effect at node boundaries: no new node is dispatched
/// after `cancel()`, and the run's collected results are returned with an
/// overall `Cancelled` status.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a fresh, non-cancelled handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Options for one execution run
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Target environment, surfaced to components via the reserved
    /// `environment` config key
    pub environment: Environment,
    /// Cancellation handle; keep a clone to abort the run
    pub cancel: CancelHandle,
}

/// Per-node execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeStatus {
    /// Not yet dispatched
    Pending,
    /// Executor is running
    Running,
    /// Terminal: executor returned outputs
    Success,
    /// Terminal: executor failed or timed out
    Error,
}

/// Whole-workflow run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    /// Every node reached `Success`
    Completed,
    /// At least one node reached `Error`
    Failed,
    /// The caller cancelled before all nodes ran
    Cancelled,
}

/// Result of executing a single node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRunResult {
    /// The node this result belongs to
    pub node_id: NodeId,
    /// Terminal (or pending, under fail-fast/cancellation) status
    pub status: NodeStatus,
    /// Output values keyed by output port id
    pub outputs: HashMap<PortId, serde_json::Value>,
    /// Error message when `status` is `Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock executor duration
    pub duration_ms: u64,
}

impl NodeRunResult {
    fn pending(node_id: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            status: NodeStatus::Pending,
            outputs: HashMap::new(),
            error: None,
            duration_ms: 0,
        }
    }
}

/// Structured result of one workflow execution.
///
/// Produced fresh per call; the engine persists nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunResult {
    /// Unique id of this run (matches emitted events)
    pub execution_id: String,
    /// Overall status
    pub status: RunStatus,
    /// True iff every node reached `Success`
    pub success: bool,
    /// Per-node results in execution order; pending nodes last
    pub node_results: Vec<NodeRunResult>,
    /// Messages from every failed node
    pub errors: Vec<String>,
    /// Outputs keyed by node id, then output port id
    pub outputs: HashMap<NodeId, HashMap<PortId, serde_json::Value>>,
}

impl WorkflowRunResult {
    /// The result for a given node, if present
    pub fn node_result(&self, node_id: &str) -> Option<&NodeRunResult> {
        self.node_results.iter().find(|r| r.node_id == node_id)
    }
}

/// Initial external inputs: node id -> port id -> value.
///
/// Values seed entry nodes; a connected upstream output always wins over
/// an initial value for the same port.
pub type InitialInputs = HashMap<NodeId, HashMap<PortId, serde_json::Value>>;

/// Topologically executes workflow graphs against a component registry
pub struct ExecutionEngine {
    registry: Arc<ComponentRegistry>,
}

impl ExecutionEngine {
    /// Create an engine over the given registry
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this engine resolves components from
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Execute a workflow.
    ///
    /// Validation-class failures (connections referencing missing nodes,
    /// cycles) are returned as `Err` before any node runs. Runtime node
    /// failures are captured into the returned `WorkflowRunResult` with
    /// `success: false`, so the caller always gets a structured result for
    /// anything that happens after execution begins.
    pub async fn execute(
        &self,
        workflow: &WorkflowDefinition,
        initial_inputs: InitialInputs,
        options: ExecutionOptions,
        event_sink: &dyn EventSink,
    ) -> Result<WorkflowRunResult> {
        let execution_id = format!("exec-{}", uuid::Uuid::new_v4());
        let order = topological_order(workflow)?;

        log::debug!(
            "Executing workflow '{}' ({} nodes) as {}",
            workflow.id,
            order.len(),
            execution_id
        );

        let _ = event_sink.send(ExecutionEvent::ExecutionStarted {
            workflow_id: workflow.id.clone(),
            execution_id: execution_id.clone(),
        });

        // Per-run accumulator: node id -> output port id -> value.
        // Function-local, so concurrent unrelated runs share nothing.
        let mut collected: HashMap<NodeId, Outputs> = HashMap::new();
        let mut node_results: Vec<NodeRunResult> = Vec::with_capacity(order.len());
        let mut errors: Vec<String> = Vec::new();
        let mut cancelled = false;

        let mut remaining: VecDeque<&WorkflowNode> = order.into();

        while let Some(node) = remaining.pop_front() {
            if options.cancel.is_cancelled() {
                cancelled = true;
                remaining.push_front(node);
                break;
            }

            let inputs =
                collect_inputs(workflow, node, &self.registry, &initial_inputs, &collected);

            let _ = event_sink.send(ExecutionEvent::NodeStarted {
                execution_id: execution_id.clone(),
                node_id: node.id.clone(),
            });

            let started = Instant::now();
            let outcome = self.dispatch(node, inputs, &options).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(outputs) => {
                    let _ = event_sink.send(ExecutionEvent::NodeCompleted {
                        execution_id: execution_id.clone(),
                        node_id: node.id.clone(),
                        outputs: serde_json::to_value(&outputs).ok(),
                    });
                    collected.insert(node.id.clone(), outputs.clone());
                    node_results.push(NodeRunResult {
                        node_id: node.id.clone(),
                        status: NodeStatus::Success,
                        outputs,
                        error: None,
                        duration_ms,
                    });
                }
                Err(err) => {
                    let message = err.to_string();
                    log::warn!("Node '{}' failed: {}", node.id, message);
                    let _ = event_sink.send(ExecutionEvent::NodeFailed {
                        execution_id: execution_id.clone(),
                        node_id: node.id.clone(),
                        error: message.clone(),
                    });
                    node_results.push(NodeRunResult {
                        node_id: node.id.clone(),
                        status: NodeStatus::Error,
                        outputs: HashMap::new(),
                        error: Some(message.clone()),
                        duration_ms,
                    });
                    errors.push(message);
                    // Fail-fast: unstarted nodes stay pending
                    break;
                }
            }
        }

        // Nodes never dispatched, under fail-fast or cancellation
        for node in remaining {
            node_results.push(NodeRunResult::pending(&node.id));
        }

        let status = if cancelled {
            let _ = event_sink.send(ExecutionEvent::ExecutionCancelled {
                workflow_id: workflow.id.clone(),
                execution_id: execution_id.clone(),
            });
            RunStatus::Cancelled
        } else if errors.is_empty() {
            let _ = event_sink.send(ExecutionEvent::ExecutionCompleted {
                workflow_id: workflow.id.clone(),
                execution_id: execution_id.clone(),
            });
            RunStatus::Completed
        } else {
            let _ = event_sink.send(ExecutionEvent::ExecutionFailed {
                workflow_id: workflow.id.clone(),
                execution_id: execution_id.clone(),
                error: errors.join("; "),
            });
            RunStatus::Failed
        };

        Ok(WorkflowRunResult {
            execution_id,
            status,
            success: status == RunStatus::Completed,
            node_results,
            errors,
            outputs: collected,
        })
    }

    /// Execute a single node in isolation (e.g., the user test-runs one
    /// node from the canvas) by building a degenerate one-node workflow
    /// and reusing the exact same pipeline.
    pub async fn execute_node(
        &self,
        node: &WorkflowNode,
        initial_inputs: HashMap<PortId, serde_json::Value>,
        options: ExecutionOptions,
        event_sink: &dyn EventSink,
    ) -> Result<WorkflowRunResult> {
        let mut workflow =
            WorkflowDefinition::new(format!("single-{}", node.id), "Single node run");
        workflow.nodes.push(node.clone());

        let mut inputs = InitialInputs::new();
        if !initial_inputs.is_empty() {
            inputs.insert(node.id.clone(), initial_inputs);
        }

        self.execute(&workflow, inputs, options, event_sink).await
    }

    /// Resolve the component, merge config, and run the executor under its
    /// declared timeout.
    async fn dispatch(
        &self,
        node: &WorkflowNode,
        inputs: Inputs,
        options: &ExecutionOptions,
    ) -> Result<Outputs> {
        let component =
            self.registry
                .get(&node.component_id)
                .ok_or_else(|| EngineError::ComponentNotFound {
                    node_id: node.id.clone(),
                    component_id: node.component_id.clone(),
                })?;

        let definition = component.definition();
        let config = resolve_config(node, &definition.configuration, options.environment);
        let timeout_ms = definition.executor.timeout_ms;

        log::debug!(
            "Dispatching node '{}' (component '{}', timeout {}ms)",
            node.id,
            node.component_id,
            timeout_ms
        );

        match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            component.execute(inputs, config),
        )
        .await
        {
            Ok(Ok(outputs)) => Ok(outputs),
            Ok(Err(err)) => Err(EngineError::node_failed(&node.id, err.to_string())),
            Err(_elapsed) => Err(EngineError::Timeout {
                node_id: node.id.clone(),
                timeout_ms,
            }),
        }
    }
}

/// Collect a node's inputs from connected upstream outputs and initial
/// external inputs.
///
/// For each input port with a connection targeting it, the value comes
/// from the source node's corresponding output (already computed by the
/// ordering invariant). Edges the validator admitted with
/// `requires_transformation` get their promised coercion applied here, by
/// resolving both ports' declared types through the registry. Ports with
/// no connection fall back to initial inputs; absent ports are simply
/// omitted; required-ness is the component's concern at run time, not the
/// engine's.
fn collect_inputs(
    workflow: &WorkflowDefinition,
    node: &WorkflowNode,
    registry: &ComponentRegistry,
    initial_inputs: &InitialInputs,
    collected: &HashMap<NodeId, Outputs>,
) -> Inputs {
    let mut inputs = initial_inputs
        .get(&node.id)
        .cloned()
        .unwrap_or_default();

    let target_def = registry.definition(&node.component_id);

    for connection in workflow.incoming_connections(&node.id) {
        let Some(value) = collected
            .get(&connection.source)
            .and_then(|outputs| outputs.get(&connection.source_port))
        else {
            continue;
        };

        let source_type = workflow
            .find_node(&connection.source)
            .and_then(|source| registry.definition(&source.component_id))
            .and_then(|d| d.output(&connection.source_port).map(|p| p.data_type));
        let target_type = target_def
            .as_ref()
            .and_then(|d| d.input(&connection.target_port).map(|p| p.data_type));

        let value = match (source_type, target_type) {
            (Some(source), Some(target)) if !source.is_compatible_with(&target) => {
                coerce_value(source, target, value)
            }
            _ => value.clone(),
        };
        inputs.insert(connection.target_port.clone(), value);
    }

    inputs
}

/// Merge a node's user-supplied config over the declared field defaults.
///
/// User value wins; a default fills the gap; a field with neither is left
/// out entirely. The run's environment is surfaced under the reserved
/// `environment` key.
fn resolve_config(
    node: &WorkflowNode,
    fields: &[crate::types::ConfigField],
    environment: Environment,
) -> Config {
    let mut config = Config::new();

    for field in fields {
        if let Some(value) = node.config.get(&field.key) {
            config.insert(field.key.clone(), value.clone());
        } else if let Some(default) = &field.default_value {
            config.insert(field.key.clone(), default.clone());
        }
    }

    // Keys the component did not declare still pass through; installed
    // components may accept ad-hoc configuration.
    for (key, value) in &node.config {
        config.entry(key.clone()).or_insert_with(|| value.clone());
    }

    config.insert(
        "environment".to_string(),
        serde_json::to_value(environment).unwrap_or(serde_json::Value::Null),
    );

    config
}

/// Compute a topological order over the workflow's nodes using Kahn's
/// algorithm.
///
/// Connections referencing unknown nodes are rejected first. A cycle
/// fails the whole run before any node executes, naming the nodes left
/// unordered. Tie-breaks among independent nodes follow declaration
/// order and are not part of the contract.
fn topological_order(workflow: &WorkflowDefinition) -> Result<Vec<&WorkflowNode>> {
    for connection in &workflow.connections {
        for endpoint in [&connection.source, &connection.target] {
            if workflow.find_node(endpoint).is_none() {
                return Err(EngineError::InvalidConnection(format!(
                    "Connection '{}' references unknown node '{}'",
                    connection.id, endpoint
                )));
            }
        }
    }

    let mut in_degree: HashMap<&str, usize> = workflow
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), 0))
        .collect();
    for connection in &workflow.connections {
        if let Some(degree) = in_degree.get_mut(connection.target.as_str()) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = workflow
        .nodes
        .iter()
        .filter(|n| in_degree[n.id.as_str()] == 0)
        .map(|n| n.id.as_str())
        .collect();

    let mut order = Vec::with_capacity(workflow.nodes.len());
    while let Some(node_id) = queue.pop_front() {
        // Safe: queue only holds ids drawn from workflow.nodes
        if let Some(node) = workflow.find_node(node_id) {
            order.push(node);
        }
        for connection in workflow.outgoing_connections(node_id) {
            if let Some(degree) = in_degree.get_mut(connection.target.as_str()) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(&connection.target);
                }
            }
        }
    }

    if order.len() < workflow.nodes.len() {
        let ordered: std::collections::HashSet<&str> =
            order.iter().map(|n| n.id.as_str()).collect();
        let nodes = workflow
            .nodes
            .iter()
            .filter(|n| !ordered.contains(n.id.as_str()))
            .map(|n| n.id.clone())
            .collect();
        return Err(EngineError::CyclicWorkflow { nodes });
    }

    Ok(order)
}
