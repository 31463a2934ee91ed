//! ChainCanvas service layer
//!
//! Composes the workflow engine and the built-in DeFi components behind a
//! single facade for hosts (the canvas backend, the CLI, embedding apps):
//!
//! - [`PluginSystem`]: lifecycle, component catalog, validation, execution
//! - [`codegen`]: turns a resolved workflow into a deployable project
//! - [`export`]: workflow JSON export/import with config key normalization

pub mod codegen;
pub mod export;
pub mod plugin_system;

pub use codegen::{GeneratedFile, GeneratedProject};
pub use export::{export_workflow, import_workflow};
pub use plugin_system::PluginSystem;
