//! Component dispatch.
//!
//! [`Engine`] is the entry point for rendering. A render call resolves the
//! component type, builds an instance, runs the requested action (falling back
//! to the default template) and returns the produced text. Collections render
//! one instance per element and concatenate the results. Cacheable components
//! go through the fragment cache so that a hit skips the action entirely.
//!
//! The engine is cheap to clone; clones share configuration, registry and
//! collaborators.

mod context;
mod iteration;
mod options;

pub use context::ViewContext;
pub use iteration::IterationMetadata;
pub use options::{Block, RenderOptions};

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tera::{Context as TeraContext, Tera};

use crate::cache::{FragmentCache, FragmentStore, MemoryFragmentStore};
use crate::component::declared::register_declared;
use crate::component::{Attributes, ComponentClass, ComponentInstance, ComponentRegistry};
use crate::config::EngineConfig;
use crate::core::ComponentError;
use crate::helpers;
use crate::templating::{
    DigestProvider, FileSystemTemplates, MemoryTemplates, Template, TemplateDigestor, TemplateLookup,
    TemplateRenderer,
};

struct EngineInner {
    config: EngineConfig,
    registry: ComponentRegistry,
    templates: Arc<dyn TemplateLookup>,
    digests: Arc<dyn DigestProvider>,
    store: Arc<dyn FragmentStore>,
    renderer: TemplateRenderer,
    discovered: Vec<String>,
}

/// Renders components.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.inner.registry
    }

    pub fn templates(&self) -> &Arc<dyn TemplateLookup> {
        &self.inner.templates
    }

    pub fn digests(&self) -> &Arc<dyn DigestProvider> {
        &self.inner.digests
    }

    pub fn store(&self) -> &Arc<dyn FragmentStore> {
        &self.inner.store
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.inner.renderer
    }

    /// Component directories found under the template root.
    pub fn discovered_components(&self) -> &[String] {
        &self.inner.discovered
    }

    /// Names available as template helper functions.
    pub fn helper_names(&self) -> Vec<String> {
        helpers::helper_names(self)
    }

    /// Register a component class, replacing any class with the same type name.
    pub fn define(&self, class: Arc<ComponentClass>) {
        self.inner.registry.register(class);
    }

    /// Render `component` in a fresh view.
    ///
    /// `options.action` selects the action and defaults to `show`.
    pub fn render(&self, component: &str, options: RenderOptions) -> Result<String> {
        let mut view = ViewContext::new(self.clone());
        view.component(component, options)
    }

    /// Render `action` for a single object or for each element of a collection.
    ///
    /// When both `collection` and `object` are present the collection wins and
    /// the object is ignored.
    pub fn render_action(&self, action: &str, view: &mut ViewContext, mut options: RenderOptions) -> Result<String> {
        match options.collection.take() {
            Some(collection) => {
                if options.object.is_some() {
                    tracing::debug!("Ignoring `object` for '{}': a collection was given", action);
                    options.object = None;
                }
                self.render_collection(action, view, &collection, options)
            }
            None => {
                let object = options.object.take();
                self.render_object(action, view, object, options)
            }
        }
    }

    /// Render every element of `collection` and concatenate the outputs.
    ///
    /// Each element gets its own instance with `collection_iteration` set. The
    /// first failure aborts the whole collection.
    pub fn render_collection(
        &self,
        action: &str,
        view: &mut ViewContext,
        collection: &[Value],
        options: RenderOptions,
    ) -> Result<String> {
        let size = collection.len();
        tracing::debug!("Rendering collection of {} for action '{}'", size, action);

        let mut output = String::new();
        for (index, item) in collection.iter().enumerate() {
            let mut element_options = options.clone();
            element_options.collection_iteration = Some(IterationMetadata::new(index, size));
            let rendered = self
                .render_object(action, view, Some(item.clone()), element_options)
                .map_err(|e| {
                    e.context(ComponentError::CollectionElementFailed {
                        index,
                        size,
                    })
                })?;
            output.push_str(&rendered);
        }
        Ok(output)
    }

    /// Render `action` for one object.
    pub fn render_object(
        &self,
        action: &str,
        view: &mut ViewContext,
        object: Option<Value>,
        options: RenderOptions,
    ) -> Result<String> {
        let config = &self.inner.config;
        if view.depth() >= config.max_render_depth {
            return Err(ComponentError::RenderDepthExceeded {
                depth: view.depth(),
            }
            .into());
        }

        let class = self.inner.registry.resolve(options.component.as_deref(), config.resolution)?;
        let mut component = ComponentInstance::new(class, object, view, action, options)?;

        let cache = FragmentCache::new(self.inner.store.as_ref(), self.inner.digests.as_ref(), config);
        cache.fetch(&mut component, |component| Self::run_action(component, view))?;

        Ok(component.into_response_body().unwrap_or_default())
    }

    /// Run the instance's action, then the default render if it produced nothing.
    fn run_action(component: &mut ComponentInstance, view: &mut ViewContext) -> Result<()> {
        if let Some(action) = component.class().find_action(component.action_name()) {
            tracing::trace!("Running action '{}' of {}", component.action_name(), component.class().type_name());
            action(component, view)?;
        }
        if component.response_body().is_none() {
            component.default_render(view)?;
        }
        Ok(())
    }

    /// Install the component helper functions for templates rendered at `depth`.
    pub fn register_helpers(&self, tera: &mut Tera, depth: usize) {
        helpers::register_helpers(self, tera, depth);
    }

    /// Render a page-level template that may call components.
    pub fn render_page(&self, source: &str, locals: &Attributes) -> Result<String> {
        let template = Template {
            identity: "page#inline".to_string(),
            source: source.to_string(),
            file_path: None,
        };
        let mut context = TeraContext::new();
        for (name, value) in locals {
            context.insert(name.as_str(), value);
        }
        let rendered = self.inner.renderer.render(&template, &context, &|tera| self.register_helpers(tera, 0))?;
        Ok(rendered)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.inner.config)
            .field("components", &self.inner.registry.component_names())
            .field("discovered", &self.inner.discovered)
            .finish()
    }
}

/// Builder for [`Engine`].
///
/// Collaborators not supplied explicitly are derived from the configuration:
/// templates come from `template_root` when set (in memory otherwise), digests
/// hash the template sources, and fragments are kept in memory.
#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    templates: Option<Arc<dyn TemplateLookup>>,
    digests: Option<Arc<dyn DigestProvider>>,
    store: Option<Arc<dyn FragmentStore>>,
    components: Vec<Arc<ComponentClass>>,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn templates(mut self, templates: Arc<dyn TemplateLookup>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn digests(mut self, digests: Arc<dyn DigestProvider>) -> Self {
        self.digests = Some(digests);
        self
    }

    pub fn store(mut self, store: Arc<dyn FragmentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register a component class at build time.
    pub fn component(mut self, class: Arc<ComponentClass>) -> Self {
        self.components.push(class);
        self
    }

    pub fn build(self) -> Result<Engine> {
        let config = self.config;

        let templates: Arc<dyn TemplateLookup> = match (self.templates, &config.template_root) {
            (Some(templates), _) => templates,
            (None, Some(root)) => Arc::new(FileSystemTemplates::new(root.clone(), config.template_extension.clone())),
            (None, None) => Arc::new(MemoryTemplates::new()),
        };
        let digests = self.digests.unwrap_or_else(|| Arc::new(TemplateDigestor::new(Arc::clone(&templates))));
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryFragmentStore::new()));

        let registry = ComponentRegistry::new();
        for class in self.components {
            registry.register(class);
        }
        register_declared(&config.components, &registry).context("Failed to register configured components")?;

        let discovered = match &config.template_root {
            Some(root) if root.is_dir() => helpers::component_directories(root)?,
            Some(root) => {
                tracing::warn!("Template root {} does not exist", root.display());
                Vec::new()
            }
            None => Vec::new(),
        };

        tracing::debug!(
            "Engine ready: {} component type(s), {} template director(ies)",
            registry.component_names().len(),
            discovered.len()
        );

        Ok(Engine {
            inner: Arc::new(EngineInner {
                renderer: TemplateRenderer::new(config.autoescape),
                config,
                registry,
                templates,
                digests,
                store,
                discovered,
            }),
        })
    }
}
