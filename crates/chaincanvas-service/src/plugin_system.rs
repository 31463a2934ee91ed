//! Plugin system facade
//!
//! The single entry point hosts interact with. Owns the component
//! registry and the execution engine, and gates every operation behind an
//! explicit `initialize()` so hosts control exactly when built-ins load.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Linked for its inventory submissions: built-in components register
// themselves when this crate is part of the binary.
use defi_components as _;

use flow_engine::{
    CallbackComponent, ComponentDefinition, ComponentRegistry, ConnectionCheck,
    ConnectionProposal, ConnectionValidator, EngineError, EventSink, ExecutionEngine,
    ExecutionOptions, InitialInputs, Inputs, Outputs, Result, ValidationError,
    WorkflowDefinition, WorkflowNode, WorkflowRunResult,
};

use crate::codegen::{self, GeneratedProject};

/// Facade over registry, validator, and engine
pub struct PluginSystem {
    registry: Arc<ComponentRegistry>,
    engine: ExecutionEngine,
    initialized: AtomicBool,
}

impl PluginSystem {
    /// Create an uninitialized plugin system with an empty registry
    pub fn new() -> Self {
        let registry = Arc::new(ComponentRegistry::new());
        let engine = ExecutionEngine::new(registry.clone());
        Self {
            registry,
            engine,
            initialized: AtomicBool::new(false),
        }
    }

    /// Load all built-in components. Idempotent: a second call is a no-op.
    pub fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            log::debug!("Plugin system already initialized");
            return;
        }
        self.registry.register_builtins();
        log::info!(
            "Plugin system initialized with {} built-in components",
            self.registry.len()
        );
    }

    /// Whether `initialize` has been called
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// The shared component registry
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Execute a workflow end to end
    pub async fn execute_workflow(
        &self,
        workflow: &WorkflowDefinition,
        initial_inputs: InitialInputs,
        options: ExecutionOptions,
        event_sink: &dyn EventSink,
    ) -> Result<WorkflowRunResult> {
        self.require_initialized()?;
        self.engine
            .execute(workflow, initial_inputs, options, event_sink)
            .await
    }

    /// Execute one node in isolation
    pub async fn execute_node(
        &self,
        node: &WorkflowNode,
        initial_inputs: std::collections::HashMap<String, serde_json::Value>,
        options: ExecutionOptions,
        event_sink: &dyn EventSink,
    ) -> Result<WorkflowRunResult> {
        self.require_initialized()?;
        self.engine
            .execute_node(node, initial_inputs, options, event_sink)
            .await
    }

    /// Definition of a single component, if registered
    pub fn get_component(&self, id: &str) -> Option<ComponentDefinition> {
        self.registry.definition(id)
    }

    /// All registered component definitions (palette catalog)
    pub fn list_components(&self) -> Vec<ComponentDefinition> {
        self.registry.list()
    }

    /// Install a component at runtime (marketplace path).
    ///
    /// Installing under an existing id replaces it, which is how updates
    /// ship.
    pub fn install_component<F, Fut>(
        &self,
        definition: ComponentDefinition,
        executor: F,
    ) -> Result<()>
    where
        F: Fn(Inputs, flow_engine::Config) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Outputs>> + Send + 'static,
    {
        self.require_initialized()?;
        let id = definition.id.clone();
        self.registry
            .register(Arc::new(CallbackComponent::new(definition, executor)))?;
        log::info!("Installed component '{}'", id);
        Ok(())
    }

    /// Remove a component, returning whether it was present
    pub fn uninstall_component(&self, id: &str) -> bool {
        self.registry.unregister(id)
    }

    /// Validate a proposed connection between two component ports
    pub fn validate_connection(&self, proposal: &ConnectionProposal) -> ConnectionCheck {
        ConnectionValidator::new(&self.registry).validate(proposal)
    }

    /// Pre-flight validation of a whole workflow
    pub fn validate_workflow(&self, workflow: &WorkflowDefinition) -> Vec<ValidationError> {
        flow_engine::validate_workflow(workflow, &self.registry)
    }

    /// Generate a deployable project from a workflow
    pub fn generate_code(&self, workflow: &WorkflowDefinition) -> Result<GeneratedProject> {
        self.require_initialized()?;
        codegen::generate(workflow, &self.registry)
    }

    fn require_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(EngineError::NotInitialized)
        }
    }
}

impl Default for PluginSystem {
    fn default() -> Self {
        Self::new()
    }
}
