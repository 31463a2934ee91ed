//! Workflow export and import
//!
//! Workflows travel as JSON between the canvas, saved projects, and the
//! marketplace. Export is a straight serialization. Import additionally
//! normalizes legacy snake_case config keys onto each component's declared
//! camelCase keys (early saved projects used snake_case) and runs the full
//! pre-flight validation so a broken file is rejected at the door, not at
//! run time.

use flow_engine::{
    validate_workflow, ComponentRegistry, EngineError, Result, WorkflowDefinition,
};

/// Serialize a workflow to pretty-printed JSON
pub fn export_workflow(workflow: &WorkflowDefinition) -> Result<String> {
    Ok(serde_json::to_string_pretty(workflow)?)
}

/// Parse, normalize, and validate a workflow from JSON.
///
/// Config keys that don't match a declared field are retried in camelCase
/// form; a match renames the key, no match leaves it untouched (installed
/// components may accept ad-hoc keys). Validation failures are joined
/// into a single `InvalidConnection` error.
pub fn import_workflow(
    json: &str,
    registry: &ComponentRegistry,
) -> Result<WorkflowDefinition> {
    let mut workflow: WorkflowDefinition = serde_json::from_str(json)?;
    normalize_config_keys(&mut workflow, registry);

    let errors = validate_workflow(&workflow, registry);
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(EngineError::InvalidConnection(joined));
    }

    log::debug!(
        "Imported workflow '{}' ({} nodes)",
        workflow.id,
        workflow.nodes.len()
    );
    Ok(workflow)
}

fn normalize_config_keys(workflow: &mut WorkflowDefinition, registry: &ComponentRegistry) {
    for node in &mut workflow.nodes {
        let Some(definition) = registry.definition(&node.component_id) else {
            continue;
        };

        let renames: Vec<(String, String)> = node
            .config
            .keys()
            .filter(|key| definition.config_field(key).is_none())
            .filter_map(|key| {
                let camel = snake_to_camel(key);
                if camel != **key && definition.config_field(&camel).is_some() {
                    Some((key.clone(), camel))
                } else {
                    None
                }
            })
            .collect();

        for (old, new) in renames {
            if let Some(value) = node.config.remove(&old) {
                log::debug!("Normalized config key '{}' -> '{}' on node '{}'", old, new, node.id);
                // Declared key wins if the file carries both spellings
                node.config.entry(new).or_insert(value);
            }
        }
    }
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
