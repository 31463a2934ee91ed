//! Core workflow execution engine for ChainCanvas
//!
//! Provides the domain-agnostic machinery behind the visual canvas: a
//! component registry with typed ports, a connection validator with an
//! implicit-conversion table, and a topological execution engine with
//! fail-fast semantics, per-node timeouts, and cancellation.
//!
//! This crate knows nothing about DeFi. Concrete components (wallets,
//! 1inch quotes, bridges) live in `defi-components` behind the
//! [`Component`] trait; the host-facing facade lives in
//! `chaincanvas-service`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use flow_engine::builder::WorkflowBuilder;
//! use flow_engine::{
//!     CallbackComponent, ComponentCategory, ComponentDefinition, ComponentRegistry,
//!     ExecutionEngine, ExecutionOptions, ExecutorSpec, NullEventSink, Outputs,
//!     PortDataType, PortDefinition,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = ComponentRegistry::new();
//! registry
//!     .register(Arc::new(CallbackComponent::new(
//!         ComponentDefinition {
//!             id: "greeter".to_string(),
//!             category: ComponentCategory::Data,
//!             label: "Greeter".to_string(),
//!             description: "Produces a greeting".to_string(),
//!             inputs: vec![],
//!             outputs: vec![PortDefinition::optional("text", "Text", PortDataType::String)],
//!             configuration: vec![],
//!             executor: ExecutorSpec::local(),
//!         },
//!         |_inputs, _config| async {
//!             let mut outputs = Outputs::new();
//!             outputs.insert("text".to_string(), serde_json::json!("hello"));
//!             Ok(outputs)
//!         },
//!     )))
//!     .unwrap();
//!
//! let engine = ExecutionEngine::new(Arc::new(registry));
//! let workflow = WorkflowBuilder::new("wf", "Greeting")
//!     .add_node("g", "greeter")
//!     .build();
//!
//! let result = engine
//!     .execute(&workflow, Default::default(), ExecutionOptions::default(), &NullEventSink)
//!     .await
//!     .unwrap();
//! assert!(result.success);
//! # }
//! ```

pub mod builder;
pub mod component;
pub mod engine;
pub mod error;
pub mod events;
pub mod registry;
pub mod types;
pub mod validation;

pub use component::{CallbackComponent, Component, ComponentCtor, Config, Inputs, Outputs};
pub use engine::{
    CancelHandle, Environment, ExecutionEngine, ExecutionOptions, InitialInputs, NodeRunResult,
    NodeStatus, RunStatus, WorkflowRunResult,
};
pub use error::{EngineError, Result};
pub use events::{EventError, EventSink, ExecutionEvent, NullEventSink, VecEventSink};
pub use registry::{ComponentRegistry, RegistryEvent};
pub use types::{
    ComponentCategory, ComponentDefinition, ComponentId, ConfigField, ConfigFieldType,
    ConnectionId, ExecutorKind, ExecutorSpec, NodeId, PortDataType, PortDefinition, PortId,
    WorkflowConnection, WorkflowDefinition, WorkflowNode,
};
pub use validation::{
    check_types, coerce_value, validate_workflow, ConnectionCheck, ConnectionProposal,
    ConnectionValidator, ValidationError,
};
