//! Component classes declared in configuration.

use anyhow::Result;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::class::ComponentClass;
use super::registry::ComponentRegistry;
use crate::config::ComponentDecl;
use crate::core::ComponentError;

/// Build one declared class on top of `parent`.
pub fn build_declared(type_name: &str, decl: &ComponentDecl, parent: Arc<ComponentClass>) -> Arc<ComponentClass> {
    let mut builder = ComponentClass::builder(type_name).parent(parent);
    if let Some(path) = &decl.path {
        builder = builder.path(path.clone());
    }
    for (name, default) in &decl.defaults {
        builder = builder.attribute(name.clone(), default.clone());
    }
    if let Some(names) = decl.cache_key.clone() {
        builder = builder.cache_key(move |component| {
            Ok(Value::Array(
                names.iter().map(|name| component.attribute(name).cloned().unwrap_or(Value::Null)).collect(),
            ))
        });
    }
    builder.build()
}

/// Register every declared class, parents before children.
///
/// A parent may be another declared class or one already in the registry.
/// Inheritance is ordered with a parent-to-child graph; a cycle or an unknown
/// parent is a configuration error.
pub fn register_declared(decls: &BTreeMap<String, ComponentDecl>, registry: &ComponentRegistry) -> Result<()> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let nodes: HashMap<&str, NodeIndex> =
        decls.keys().map(|type_name| (type_name.as_str(), graph.add_node(type_name.as_str()))).collect();

    for (type_name, decl) in decls {
        let Some(parent) = decl.parent.as_deref() else {
            continue;
        };
        match nodes.get(parent) {
            Some(&parent_idx) => {
                graph.add_edge(parent_idx, nodes[type_name.as_str()], ());
            }
            None if registry.get(parent).is_some() => {}
            None => {
                return Err(ComponentError::ConfigError {
                    message: format!("component '{type_name}' inherits from unknown component '{parent}'"),
                }
                .into());
            }
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| ComponentError::ConfigError {
        message: format!("circular component inheritance involving '{}'", graph[cycle.node_id()]),
    })?;

    for idx in order {
        let type_name = graph[idx];
        let decl = &decls[type_name];
        let parent = match decl.parent.as_deref() {
            None => ComponentClass::base(),
            Some(parent) => registry.get(parent).ok_or_else(|| ComponentError::ConfigError {
                message: format!("component '{type_name}' inherits from unknown component '{parent}'"),
            })?,
        };
        registry.register(build_declared(type_name, decl, parent));
    }
    Ok(())
}
