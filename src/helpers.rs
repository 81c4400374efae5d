//! Template helpers exposing components to templates.
//!
//! Every template rendered by the engine gets a generic `component(...)`
//! function plus one function per known component name:
//!
//! ```text
//! {{ component(component="card", title="Hello") | safe }}
//! {{ card(title="Hello", action="compact") | safe }}
//! {{ card(collection=posts) | safe }}
//! ```
//!
//! Known names are the references of registered component types and the sub-directories of
//! the template root. Nested renders run in their own [`ViewContext`] with
//! their own output buffer.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tera::{Tera, Value};
use walkdir::WalkDir;

use crate::constants::IGNORED_COMPONENT_DIRS;
use crate::render::{Engine, RenderOptions, ViewContext};

/// Name of the generic helper.
pub const GENERIC_HELPER: &str = "component";

/// Functions Tera defines itself; never shadowed by component helpers.
const TERA_BUILTIN_FUNCTIONS: &[&str] = &["range", "now", "throw", "get_random", "get_env"];

/// Sub-directories of `root` that hold component templates, sorted.
///
/// Hidden directories and [`IGNORED_COMPONENT_DIRS`] are skipped.
pub fn component_directories(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list component directory {}", root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || IGNORED_COMPONENT_DIRS.contains(&name.as_str()) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Whether `name` can be registered as a Tera function.
pub fn is_helper_name(name: &str) -> bool {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    };
    valid && name != GENERIC_HELPER && !TERA_BUILTIN_FUNCTIONS.contains(&name)
}

/// Names that get their own helper function.
pub fn helper_names(engine: &Engine) -> Vec<String> {
    let names: BTreeSet<String> = engine
        .registry()
        .references()
        .into_iter()
        .chain(engine.discovered_components().iter().cloned())
        .filter(|name| is_helper_name(name))
        .collect();
    names.into_iter().collect()
}

/// Install the component helpers into `tera`.
///
/// `depth` is the nesting depth the helper renders run at.
pub fn register_helpers(engine: &Engine, tera: &mut Tera, depth: usize) {
    tera.register_function(GENERIC_HELPER, component_function(engine.clone(), None, depth));
    for name in helper_names(engine) {
        let function = component_function(engine.clone(), Some(name.clone()), depth);
        tera.register_function(&name, function);
    }
}

fn component_function(
    engine: Engine,
    name: Option<String>,
    depth: usize,
) -> impl Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static {
    move |args: &HashMap<String, Value>| {
        let mut options = RenderOptions::from_map(args.clone());
        let component = match (&name, options.component.take()) {
            (Some(name), _) => name.clone(),
            (None, Some(component)) => component,
            (None, None) => {
                return Err(tera::Error::msg(format!(
                    "{GENERIC_HELPER}() requires a `component` argument"
                )));
            }
        };

        let mut view = ViewContext::nested(engine.clone(), depth);
        view.component(&component, options)
            .map(Value::String)
            .map_err(|e| tera::Error::msg(format!("{e:#}")))
    }
}
