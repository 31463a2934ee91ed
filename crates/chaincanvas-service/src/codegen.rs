//! Code generation
//!
//! Turns a fully resolved workflow (definitions looked up, configs merged
//! over declared defaults) into a small deployable project. The generator
//! refuses to emit anything if a node references an unknown component;
//! half-resolved output helps nobody.
//!
//! Secret config fields never make it into generated files. The generated
//! app reads them from its own environment at runtime.

use std::collections::HashSet;

use flow_engine::{
    ComponentRegistry, EngineError, Result, WorkflowDefinition, WorkflowNode,
};

/// One file of a generated project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the project root
    pub path: String,
    pub contents: String,
}

/// A generated, deployable project
#[derive(Debug, Clone)]
pub struct GeneratedProject {
    /// Directory-safe project name derived from the workflow name
    pub name: String,
    pub files: Vec<GeneratedFile>,
}

impl GeneratedProject {
    /// Find a generated file by path
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Generate a project from a workflow.
///
/// Every node's component must be registered; the first unknown one
/// aborts generation with `ComponentNotFound`.
pub fn generate(
    workflow: &WorkflowDefinition,
    registry: &ComponentRegistry,
) -> Result<GeneratedProject> {
    let name = slugify(&workflow.name);

    let mut component_ids: Vec<String> = Vec::new();
    let mut resolved_nodes: Vec<serde_json::Value> = Vec::new();
    for node in ordered_nodes(workflow) {
        let definition = registry.definition(&node.component_id).ok_or_else(|| {
            EngineError::ComponentNotFound {
                node_id: node.id.clone(),
                component_id: node.component_id.clone(),
            }
        })?;

        if !component_ids.contains(&definition.id) {
            component_ids.push(definition.id.clone());
        }

        // Merge user config over defaults, dropping secrets
        let mut config = serde_json::Map::new();
        for field in &definition.configuration {
            if field.sensitive {
                continue;
            }
            if let Some(value) = node.config.get(&field.key) {
                config.insert(field.key.clone(), value.clone());
            } else if let Some(default) = &field.default_value {
                config.insert(field.key.clone(), default.clone());
            }
        }

        resolved_nodes.push(serde_json::json!({
            "id": node.id,
            "componentId": node.component_id,
            "label": definition.label,
            "config": config,
        }));
    }

    log::info!(
        "Generating project '{}' ({} nodes, {} component types)",
        name,
        resolved_nodes.len(),
        component_ids.len()
    );

    let config_json = serde_json::to_string_pretty(&serde_json::json!({
        "name": name,
        "workflowId": workflow.id,
        "components": component_ids,
    }))?;

    let workflow_json = serde_json::to_string_pretty(&serde_json::json!({
        "id": workflow.id,
        "name": workflow.name,
        "nodes": resolved_nodes,
        "connections": workflow.connections,
    }))?;

    let app_ts = render_app(workflow, &resolved_nodes);

    Ok(GeneratedProject {
        name,
        files: vec![
            GeneratedFile {
                path: "chaincanvas.config.json".to_string(),
                contents: config_json,
            },
            GeneratedFile {
                path: "workflow.json".to_string(),
                contents: workflow_json,
            },
            GeneratedFile {
                path: "src/app.ts".to_string(),
                contents: app_ts,
            },
        ],
    })
}

/// Nodes in dependency order (declaration order among independent nodes).
/// Cyclic leftovers are appended as-is; the engine rejects cycles at run
/// time, codegen stays total.
fn ordered_nodes(workflow: &WorkflowDefinition) -> Vec<&WorkflowNode> {
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut ordered = Vec::with_capacity(workflow.nodes.len());

    while ordered.len() < workflow.nodes.len() {
        let mut progressed = false;
        for node in &workflow.nodes {
            if emitted.contains(node.id.as_str()) {
                continue;
            }
            let ready = workflow
                .dependencies(&node.id)
                .iter()
                .all(|dep| emitted.contains(dep.as_str()) || workflow.find_node(dep).is_none());
            if ready {
                emitted.insert(node.id.as_str());
                ordered.push(node);
                progressed = true;
            }
        }
        if !progressed {
            for node in &workflow.nodes {
                if emitted.insert(node.id.as_str()) {
                    ordered.push(node);
                }
            }
        }
    }
    ordered
}

fn render_app(workflow: &WorkflowDefinition, resolved_nodes: &[serde_json::Value]) -> String {
    let mut steps = String::new();
    for node in resolved_nodes {
        steps.push_str(&format!(
            "  // {} ({})\n  await runtime.run(\"{}\");\n",
            node["label"].as_str().unwrap_or_default(),
            node["componentId"].as_str().unwrap_or_default(),
            node["id"].as_str().unwrap_or_default(),
        ));
    }

    format!(
        "// Generated by ChainCanvas from workflow \"{}\"\n\
         import {{ WorkflowRuntime }} from \"@chaincanvas/runtime\";\n\
         import workflow from \"../workflow.json\";\n\
         \n\
         export async function main(): Promise<void> {{\n\
         \x20 const runtime = new WorkflowRuntime(workflow);\n\
         {}\
         }}\n",
        workflow.name, steps
    )
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    // Collapse runs of separators
    let mut out = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    if out.is_empty() {
        "chaincanvas-app".to_string()
    } else {
        out
    }
}
