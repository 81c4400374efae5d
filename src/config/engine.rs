//! Engine configuration for componentry.
//!
//! The configuration is an explicit value injected into the engine when it is
//! built; nothing in the render pipeline reads ambient global state.
//!
//! # File Format
//!
//! ```toml
//! perform_caching = true
//! environment = "production"
//! resolution = "fallback"
//! template_root = "app/components"
//!
//! [components.CardComponent]
//! defaults = { title = "Untitled" }
//! cache_key = ["title"]
//!
//! [components.FeaturedCardComponent]
//! parent = "CardComponent"
//! path = "featured"
//! ```
//!
//! # Location
//!
//! 1. An explicit path given by the caller
//! 2. The file named by `COMPONENTRY_CONFIG_PATH`
//! 3. `components.toml` in the working directory
//!
//! A missing file yields [`EngineConfig::default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, DEFAULT_MAX_RENDER_DEPTH, DEFAULT_TEMPLATE_EXTENSION,
};

/// Deployment environment the engine runs in.
///
/// Only `Development` changes behaviour: the default cache key is `false`
/// there, so components without their own cache key are simply not cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    #[default]
    Production,
}

/// What the dispatcher does when a symbolic component reference matches no type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPolicy {
    /// Render through the generic base component, keeping existing call sites working.
    #[default]
    Fallback,
    /// Fail with [`ComponentError::UnresolvedComponent`](crate::core::ComponentError::UnresolvedComponent).
    Strict,
}

/// A component class declared in configuration rather than in code.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ComponentDecl {
    /// Declared attribute defaults.
    pub defaults: BTreeMap<String, Value>,

    /// Template path override; derived from the type name when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Type name of another configured component to inherit from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Attribute names whose values, in order, form the cache key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<Vec<String>>,
}

/// Configuration injected into [`Engine`](crate::render::Engine) at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Application-wide caching switch.
    pub perform_caching: bool,

    pub environment: Environment,

    pub resolution: ResolutionPolicy,

    /// Escape HTML in interpolated values.
    pub autoescape: bool,

    /// Directory holding component templates, one sub-directory per component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_root: Option<PathBuf>,

    /// Extension of template files under `template_root`.
    pub template_extension: String,

    /// Maximum nesting of component renders within templates.
    pub max_render_depth: usize,

    /// Component classes declared in configuration, keyed by type name.
    pub components: BTreeMap<String, ComponentDecl>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            perform_caching: true,
            environment: Environment::default(),
            resolution: ResolutionPolicy::default(),
            autoescape: true,
            template_root: None,
            template_extension: DEFAULT_TEMPLATE_EXTENSION.to_string(),
            max_render_depth: DEFAULT_MAX_RENDER_DEPTH,
            components: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_with_optional(None)
    }

    /// Load configuration from `path` if given, otherwise from the default location.
    ///
    /// An explicitly given path must exist; the default location may be absent.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(&path);
        }

        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config from {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse engine config from {}", path.display()))?;

        // Relative template roots are relative to the config file
        if let (Some(root), Some(dir)) = (&config.template_root, path.parent())
            && root.is_relative()
        {
            config.template_root = Some(dir.join(root));
        }

        tracing::debug!(
            "Loaded engine config from {} ({} declared components)",
            path.display(),
            config.components.len()
        );
        Ok(config)
    }

    /// Write configuration as TOML.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize engine config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write engine config to {}", path.display()))
    }

    /// The configuration path honouring `COMPONENTRY_CONFIG_PATH`.
    pub fn default_path() -> PathBuf {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    /// Whether the default cache key is lenient (returns `false` instead of failing).
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
