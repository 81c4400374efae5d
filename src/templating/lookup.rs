//! Template lookup collaborators.
//!
//! A lookup resolves a template name against an ordered prefix list, most
//! specific prefix first. Names containing `/` are treated as full paths and
//! looked up verbatim.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::core::ComponentError;

/// A resolved template: its logical identity (virtual path) and source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Virtual path the template was found under, e.g. `card/show`.
    pub identity: String,
    pub source: String,
    /// File the source was read from, when it came from disk.
    pub file_path: Option<PathBuf>,
}

/// Resolves and loads templates.
pub trait TemplateLookup: Send + Sync {
    /// Load the template stored under an exact virtual path.
    fn load(&self, path: &str) -> Result<Option<Template>>;

    /// Resolve `name` against `prefixes`, trying each candidate in order.
    ///
    /// Fails with [`ComponentError::TemplateNotFound`] listing every candidate tried.
    fn find(&self, name: &str, prefixes: &[String]) -> Result<Template> {
        let searched = candidate_paths(name, prefixes);
        for candidate in &searched {
            if let Some(template) = self.load(candidate)? {
                tracing::trace!("Resolved template '{}' to '{}'", name, candidate);
                return Ok(template);
            }
        }

        Err(ComponentError::TemplateNotFound {
            name: name.to_string(),
            searched,
        }
        .into())
    }
}

/// Candidate virtual paths for `name`, in lookup order.
pub fn candidate_paths(name: &str, prefixes: &[String]) -> Vec<String> {
    let name = name.trim_start_matches('/');
    if name.contains('/') || prefixes.is_empty() {
        return vec![name.to_string()];
    }

    prefixes
        .iter()
        .map(|prefix| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            }
        })
        .collect()
}

/// Templates held in memory, keyed by virtual path.
#[derive(Debug, Default)]
pub struct MemoryTemplates {
    templates: RwLock<HashMap<String, String>>,
}

impl MemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_template(self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Add or replace a template.
    pub fn insert(&self, path: impl Into<String>, source: impl Into<String>) {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), source.into());
    }

    /// Virtual paths of every stored template, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> =
            self.templates.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl TemplateLookup for MemoryTemplates {
    fn load(&self, path: &str) -> Result<Option<Template>> {
        let templates = self.templates.read().unwrap_or_else(PoisonError::into_inner);
        Ok(templates.get(path).map(|source| Template {
            identity: path.to_string(),
            source: source.clone(),
            file_path: None,
        }))
    }
}

/// Templates stored as `<root>/<virtual path>.<extension>` files.
#[derive(Debug, Clone)]
pub struct FileSystemTemplates {
    root: PathBuf,
    extension: String,
}

impl FileSystemTemplates {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            bail!("Template path '{}' escapes the template root", path);
        }
        Ok(self.root.join(format!("{path}.{}", self.extension)))
    }
}

impl TemplateLookup for FileSystemTemplates {
    fn load(&self, path: &str) -> Result<Option<Template>> {
        let file = self.file_for(path)?;
        if !file.is_file() {
            return Ok(None);
        }

        let source = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read template {}", file.display()))?;

        Ok(Some(Template {
            identity: path.to_string(),
            source,
            file_path: Some(file),
        }))
    }
}
