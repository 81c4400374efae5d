//! Per-call component instances.
//!
//! An instance is built for one render call (or one collection element),
//! mutated by its action and the render pipeline, and dropped once its output
//! has been returned.

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tera::Context as TeraContext;

use super::attributes::{self, Attributes};
use super::class::ComponentClass;
use crate::config::EngineConfig;
use crate::core::ComponentError;
use crate::render::{IterationMetadata, RenderOptions, ViewContext};
use crate::templating::Template;

/// A component bound to its data object, action and attributes.
#[derive(Debug)]
pub struct ComponentInstance {
    class: Arc<ComponentClass>,
    object: Option<Value>,
    action: String,
    component: Option<String>,
    attributes: Attributes,
    block_content: Option<Value>,
    collection_iteration: Option<IterationMetadata>,
    response_body: Option<String>,
}

impl ComponentInstance {
    /// Build an instance.
    ///
    /// Resolves attributes against the class declarations and, when the call
    /// carries a block, captures its content once through `view`.
    pub fn new(
        class: Arc<ComponentClass>,
        object: Option<Value>,
        view: &mut ViewContext,
        action: impl Into<String>,
        options: RenderOptions,
    ) -> Result<Self> {
        let attributes =
            attributes::resolve(&class.declared_attributes(), &class.instance_defaults(), &options.attributes);

        let block_content = match &options.block {
            Some(block) => Some(view.capture(block)?),
            None => None,
        };

        Ok(Self {
            class,
            object,
            action: action.into(),
            component: options.component,
            attributes,
            block_content,
            collection_iteration: options.collection_iteration,
            response_body: None,
        })
    }

    pub fn class(&self) -> &Arc<ComponentClass> {
        &self.class
    }

    pub fn object(&self) -> Option<&Value> {
        self.object.as_ref()
    }

    pub fn action_name(&self) -> &str {
        &self.action
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Content captured from the caller's block, if one was given.
    pub fn block_content(&self) -> Option<&Value> {
        self.block_content.as_ref()
    }

    pub fn collection_iteration(&self) -> Option<IterationMetadata> {
        self.collection_iteration
    }

    pub fn response_body(&self) -> Option<&str> {
        self.response_body.as_deref()
    }

    pub fn into_response_body(self) -> Option<String> {
        self.response_body
    }

    /// The symbolic reference used at the call site, or the class name.
    pub fn component_name(&self) -> String {
        match &self.component {
            Some(component) => component.clone(),
            None => self.class.component_name().to_string(),
        }
    }

    /// Template directory; the base class takes it from the call site.
    pub fn component_path(&self) -> String {
        match (&self.component, self.class.is_base()) {
            (Some(component), true) => component.clone(),
            _ => self.class.component_path(),
        }
    }

    /// Template rendered when the action does not render.
    ///
    /// The base class renders `<component>/<action>`; subclasses render
    /// `<action>` through their own prefix list.
    pub fn default_template(&self) -> String {
        if self.class.is_base() {
            format!("{}/{}", self.component_path(), self.action)
        } else {
            self.action.clone()
        }
    }

    /// Logical identity of this instance's default template.
    pub fn virtual_path(&self) -> String {
        format!("{}/{}", self.component_path(), self.action)
    }

    /// The instance's cache key.
    ///
    /// Without its own cache-key logic a component is uncacheable in
    /// development and fails with `MissingCacheKeyImplementation` elsewhere.
    pub fn cache_key(&self, config: &EngineConfig) -> Result<Value> {
        if let Some(cache_key) = self.class.cache_key_fn() {
            return cache_key(self);
        }
        if config.is_development() {
            return Ok(Value::Bool(false));
        }
        Err(ComponentError::MissingCacheKeyImplementation {
            component: self.component_name(),
        }
        .into())
    }

    /// Render a named template through the class prefixes.
    pub fn render(&mut self, view: &mut ViewContext, template: &str) -> Result<()> {
        self.ensure_not_rendered()?;
        let found = view.engine().templates().find(template, self.class.prefixes())?;
        self.render_resolved(view, &found)
    }

    /// Render a template given as source text.
    pub fn render_inline(&mut self, view: &mut ViewContext, source: &str) -> Result<()> {
        self.ensure_not_rendered()?;
        let template = Template {
            identity: format!("{}#inline", self.virtual_path()),
            source: source.to_string(),
            file_path: None,
        };
        self.render_resolved(view, &template)
    }

    /// Use `text` as the output verbatim.
    pub fn render_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.ensure_not_rendered()?;
        self.response_body = Some(text.into());
        Ok(())
    }

    /// Render [`default_template`](Self::default_template).
    pub fn default_render(&mut self, view: &mut ViewContext) -> Result<()> {
        let template = self.default_template();
        tracing::debug!("Default render of '{}' for {}", template, self.component_name());
        self.render(view, &template)
    }

    /// Variables visible to this instance's templates.
    ///
    /// Attributes shadow the built-in names.
    pub fn locals(&self) -> TeraContext {
        let mut context = TeraContext::new();
        context.insert("object", &self.object);
        context.insert("block_content", &self.block_content);
        context.insert("action_name", &self.action);
        context.insert("component_name", &self.component_name());
        if let Some(iteration) = &self.collection_iteration {
            context.insert("collection_iteration", iteration);
        }
        for (name, value) in &self.attributes {
            context.insert(name.as_str(), value);
        }
        context
    }

    pub(crate) fn set_response_body(&mut self, body: String) {
        self.response_body = Some(body);
    }

    fn render_resolved(&mut self, view: &mut ViewContext, template: &Template) -> Result<()> {
        let engine = view.engine().clone();
        let depth = view.depth();
        let body = engine
            .renderer()
            .render(template, &self.locals(), &|tera| engine.register_helpers(tera, depth + 1))?;
        self.response_body = Some(body);
        Ok(())
    }

    fn ensure_not_rendered(&self) -> Result<()> {
        if self.response_body.is_some() {
            return Err(ComponentError::DoubleRender {
                component: self.component_name(),
                action: self.action.clone(),
            }
            .into());
        }
        Ok(())
    }
}
