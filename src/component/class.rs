//! Component type descriptors.
//!
//! A [`ComponentClass`] plays the role of a component type: it carries the
//! symbolic name, template path, declared attributes, actions and cache-key
//! logic. Inheritance is an explicit ancestor chain (`parent` links) walked
//! iteratively; every class except the generic base ultimately descends from
//! [`ComponentClass::base`].

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock, PoisonError, RwLock};

use super::attributes::Attributes;
use super::instance::ComponentInstance;
use super::naming::component_name_from_type;
use crate::constants::{BASE_COMPONENT_PATH, BASE_COMPONENT_TYPE};
use crate::render::ViewContext;

/// An action body. It may render through the instance; if it does not, the
/// default template is rendered afterwards.
pub type ActionFn =
    Arc<dyn Fn(&mut ComponentInstance, &mut ViewContext) -> Result<()> + Send + Sync>;

/// Cache-key logic. `null` and `false` disable caching for the instance.
pub type CacheKeyFn = Arc<dyn Fn(&ComponentInstance) -> Result<Value> + Send + Sync>;

static BASE: LazyLock<Arc<ComponentClass>> = LazyLock::new(|| {
    Arc::new(ComponentClass {
        type_name: BASE_COMPONENT_TYPE.to_string(),
        component_name: String::new(),
        path: None,
        local_prefixes: None,
        is_base: true,
        parent: None,
        perform_caching: None,
        declared: RwLock::new(Attributes::new()),
        defaults: RwLock::new(Attributes::new()),
        actions: HashMap::new(),
        cache_key: None,
        prefixes: OnceLock::new(),
    })
});

/// A component type.
pub struct ComponentClass {
    type_name: String,
    component_name: String,
    path: Option<String>,
    local_prefixes: Option<Vec<String>>,
    is_base: bool,
    parent: Option<Arc<ComponentClass>>,
    perform_caching: Option<bool>,
    /// Append-only attribute declarations
    declared: RwLock<Attributes>,
    /// Class-level instance defaults, replaced wholesale by `set_defaults`
    defaults: RwLock<Attributes>,
    actions: HashMap<String, ActionFn>,
    cache_key: Option<CacheKeyFn>,
    prefixes: OnceLock<Vec<String>>,
}

impl ComponentClass {
    /// The generic base component the dispatcher falls back to.
    ///
    /// Its template path comes from the `component` option of each call, so a
    /// single base class can render any template directory.
    pub fn base() -> Arc<ComponentClass> {
        Arc::clone(&BASE)
    }

    /// Start defining a component type; the parent defaults to [`base`](Self::base).
    pub fn builder(type_name: impl Into<String>) -> ComponentClassBuilder {
        ComponentClassBuilder::new(type_name.into())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Symbolic name, derived from the type name unless overridden.
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Default template directory: the path override, the component name, or `application`.
    pub fn component_path(&self) -> String {
        match &self.path {
            Some(path) => path.clone(),
            None if self.component_name.is_empty() => BASE_COMPONENT_PATH.to_string(),
            None => self.component_name.clone(),
        }
    }

    pub fn is_base(&self) -> bool {
        self.is_base
    }

    pub fn parent(&self) -> Option<&Arc<ComponentClass>> {
        self.parent.as_ref()
    }

    /// This class followed by its ancestors, most specific first.
    pub fn ancestors(&self) -> impl Iterator<Item = &ComponentClass> {
        std::iter::successors(Some(self), |class| class.parent.as_deref())
    }

    /// Path segments this class itself contributes to template lookup.
    pub fn local_prefixes(&self) -> Vec<String> {
        self.local_prefixes.clone().unwrap_or_else(|| vec![self.component_path()])
    }

    /// Template lookup prefixes: own local prefixes, then every ancestor's.
    ///
    /// Computed once per class.
    pub fn prefixes(&self) -> &[String] {
        self.prefixes.get_or_init(|| {
            let prefixes: Vec<String> = self.ancestors().flat_map(|class| class.local_prefixes()).collect();
            tracing::trace!("Prefixes for {}: {:?}", self.type_name, prefixes);
            prefixes
        })
    }

    /// Declare an attribute with its default value.
    ///
    /// Declarations are append-only; redeclaring a name replaces its default.
    pub fn declare_attribute(&self, name: impl Into<String>, default: Value) {
        self.declared.write().unwrap_or_else(PoisonError::into_inner).insert(name.into(), default);
    }

    /// Declared attribute defaults including inherited declarations.
    pub fn declared_attributes(&self) -> Attributes {
        self.merged_along_chain(|class| &class.declared)
    }

    /// Replace the class-level instance defaults.
    pub fn set_defaults(&self, defaults: Attributes) {
        *self.defaults.write().unwrap_or_else(PoisonError::into_inner) = defaults;
    }

    /// Instance defaults including inherited ones.
    pub fn instance_defaults(&self) -> Attributes {
        self.merged_along_chain(|class| &class.defaults)
    }

    fn merged_along_chain(&self, field: impl Fn(&ComponentClass) -> &RwLock<Attributes>) -> Attributes {
        let chain: Vec<&ComponentClass> = self.ancestors().collect();
        let mut merged = Attributes::new();
        for class in chain.into_iter().rev() {
            let layer = field(class).read().unwrap_or_else(PoisonError::into_inner);
            merged.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// The nearest action named `action` along the ancestor chain.
    pub fn find_action(&self, action: &str) -> Option<ActionFn> {
        self.ancestors().find_map(|class| class.actions.get(action).cloned())
    }

    /// The nearest cache-key logic along the ancestor chain.
    pub fn cache_key_fn(&self) -> Option<CacheKeyFn> {
        self.ancestors().find_map(|class| class.cache_key.clone())
    }

    /// Caching switch for this class, inheriting the application-wide value.
    pub fn perform_caching(&self, application_default: bool) -> bool {
        self.ancestors().find_map(|class| class.perform_caching).unwrap_or(application_default)
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&String> = self.actions.keys().collect();
        actions.sort();
        f.debug_struct("ComponentClass")
            .field("type_name", &self.type_name)
            .field("component_name", &self.component_name)
            .field("path", &self.path)
            .field("parent", &self.parent.as_ref().map(|p| p.type_name.clone()))
            .field("actions", &actions)
            .field("cache_key", &self.cache_key.is_some())
            .finish()
    }
}

/// Builder for [`ComponentClass`].
pub struct ComponentClassBuilder {
    type_name: String,
    component_name: Option<String>,
    path: Option<String>,
    local_prefixes: Option<Vec<String>>,
    parent: Arc<ComponentClass>,
    perform_caching: Option<bool>,
    declared: Attributes,
    defaults: Attributes,
    actions: HashMap<String, ActionFn>,
    cache_key: Option<CacheKeyFn>,
}

impl ComponentClassBuilder {
    fn new(type_name: String) -> Self {
        Self {
            type_name,
            component_name: None,
            path: None,
            local_prefixes: None,
            parent: ComponentClass::base(),
            perform_caching: None,
            declared: Attributes::new(),
            defaults: Attributes::new(),
            actions: HashMap::new(),
            cache_key: None,
        }
    }

    /// Override the symbolic name derived from the type name.
    pub fn component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = Some(name.into());
        self
    }

    /// Override the template directory.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replace the lookup segments this class contributes (default: its path).
    pub fn local_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.local_prefixes = Some(prefixes);
        self
    }

    pub fn parent(mut self, parent: Arc<ComponentClass>) -> Self {
        self.parent = parent;
        self
    }

    /// Override the application-wide caching switch for this class and its descendants.
    pub fn perform_caching(mut self, enabled: bool) -> Self {
        self.perform_caching = Some(enabled);
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, default: Value) -> Self {
        self.declared.insert(name.into(), default);
        self
    }

    pub fn defaults(mut self, defaults: Attributes) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ComponentInstance, &mut ViewContext) -> Result<()> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    pub fn cache_key<F>(mut self, cache_key: F) -> Self
    where
        F: Fn(&ComponentInstance) -> Result<Value> + Send + Sync + 'static,
    {
        self.cache_key = Some(Arc::new(cache_key));
        self
    }

    pub fn build(self) -> Arc<ComponentClass> {
        let component_name =
            self.component_name.unwrap_or_else(|| component_name_from_type(&self.type_name));

        Arc::new(ComponentClass {
            type_name: self.type_name,
            component_name,
            path: self.path,
            local_prefixes: self.local_prefixes,
            is_base: false,
            parent: Some(self.parent),
            perform_caching: self.perform_caching,
            declared: RwLock::new(self.declared),
            defaults: RwLock::new(self.defaults),
            actions: self.actions,
            cache_key: self.cache_key,
            prefixes: OnceLock::new(),
        })
    }
}
