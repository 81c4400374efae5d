//! Fragment caching of component renders.
//!
//! Per render the adapter either bypasses the cache or looks the fragment up:
//!
//! - **Bypass** when the instance is of the base class, caching is switched
//!   off for the class, or the instance's cache key is `null`/`false`
//! - **Hit** when the store holds a non-empty fragment: it becomes the output
//!   and neither the action nor any template runs
//! - **Miss** otherwise: the component renders and its output is written back
//!
//! Keys fold in a digest of the default template as resolved through the
//! class prefixes, so editing the template changes every key rendered from
//! it, including keys of subclasses that inherit it. Without a digest the key
//! degrades to `(virtual path, action)`.

use anyhow::Result;
use serde_json::Value;
use std::fmt;

use super::store::FragmentStore;
use crate::component::ComponentInstance;
use crate::config::EngineConfig;
use crate::constants::{COMPONENTS_NAMESPACE, INSTRUMENT_TARGET, VIEWS_NAMESPACE};
use crate::templating::DigestProvider;

/// Structured fragment key, serialized by [`FragmentKey::store_key`].
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentKey {
    parts: Vec<Value>,
}

impl FragmentKey {
    pub fn new(parts: Vec<Value>) -> Self {
        Self {
            parts,
        }
    }

    /// Key for `virtual_path`: digest-qualified when a digest is available.
    pub fn for_template(
        virtual_path: &str,
        digest: Option<&str>,
        action: &str,
        cache_key: Value,
    ) -> Self {
        match digest {
            Some(digest) => Self::new(vec![Value::String(format!("{virtual_path}:{digest}")), cache_key]),
            None => Self::new(vec![Value::String(virtual_path.to_string()), Value::String(action.to_string())]),
        }
    }

    pub fn parts(&self) -> &[Value] {
        &self.parts
    }

    /// Whether the key carries a template digest.
    pub fn has_digest(&self) -> bool {
        matches!(self.parts.first(), Some(Value::String(first)) if first.contains(":sha256:"))
    }

    /// The key under the host framework's view namespace.
    pub fn expanded(&self) -> String {
        format!("{VIEWS_NAMESPACE}/{}", expand_value(&Value::Array(self.parts.clone())))
    }

    /// The key as written to the store, moved into the components namespace.
    pub fn store_key(&self) -> String {
        remap_namespace(&self.expanded())
    }
}

impl fmt::Display for FragmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.store_key())
    }
}

/// Replace a leading `views/` with `components/`.
pub fn remap_namespace(key: &str) -> String {
    match key.strip_prefix(&format!("{VIEWS_NAMESPACE}/")) {
        Some(rest) => format!("{COMPONENTS_NAMESPACE}/{rest}"),
        None => key.to_string(),
    }
}

/// Flatten a key part: arrays join with `/`, objects become sorted `k=v`
/// pairs joined with `&`, `null` is empty.
fn expand_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(expand_value).collect::<Vec<_>>().join("/"),
        Value::Object(map) => {
            let mut pairs: Vec<String> = map.iter().map(|(k, v)| format!("{k}={}", expand_value(v))).collect();
            pairs.sort();
            pairs.join("&")
        }
    }
}

/// Whether a cache-key value enables caching.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Why a render skipped the fragment cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassReason {
    BaseComponent,
    CachingDisabled,
    NoCacheKey,
}

/// Outcome of the cache check for one instance.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheDecision {
    Bypass(BypassReason),
    Lookup(FragmentKey),
}

/// Wraps render execution with fragment reads and writes.
pub struct FragmentCache<'a> {
    store: &'a dyn FragmentStore,
    digests: &'a dyn DigestProvider,
    config: &'a EngineConfig,
}

impl<'a> FragmentCache<'a> {
    pub fn new(store: &'a dyn FragmentStore, digests: &'a dyn DigestProvider, config: &'a EngineConfig) -> Self {
        Self {
            store,
            digests,
            config,
        }
    }

    /// Decide whether `component` takes part in caching and under which key.
    pub fn decide(&self, component: &ComponentInstance) -> Result<CacheDecision> {
        if component.class().is_base() {
            return Ok(CacheDecision::Bypass(BypassReason::BaseComponent));
        }
        if !component.class().perform_caching(self.config.perform_caching) {
            return Ok(CacheDecision::Bypass(BypassReason::CachingDisabled));
        }

        let cache_key = component.cache_key(self.config)?;
        if !is_truthy(&cache_key) {
            return Ok(CacheDecision::Bypass(BypassReason::NoCacheKey));
        }

        let virtual_path = component.virtual_path();
        let digest = self.digests.digest(&component.default_template(), component.class().prefixes());
        Ok(CacheDecision::Lookup(FragmentKey::for_template(
            &virtual_path,
            digest.as_deref(),
            component.action_name(),
            cache_key,
        )))
    }

    /// Read a non-empty fragment for `key`.
    pub fn read(&self, component: &ComponentInstance, key: &FragmentKey) -> Option<String> {
        let store_key = key.store_key();
        let fragment = self.store.read(&store_key).filter(|fragment| !fragment.is_empty());
        tracing::debug!(
            target: INSTRUMENT_TARGET,
            component = %component.component_name(),
            action = %component.action_name(),
            key = %store_key,
            hit = fragment.is_some(),
            "read_fragment"
        );
        fragment
    }

    pub fn write(&self, component: &ComponentInstance, key: &FragmentKey, body: &str) {
        let store_key = key.store_key();
        tracing::debug!(
            target: INSTRUMENT_TARGET,
            component = %component.component_name(),
            action = %component.action_name(),
            key = %store_key,
            bytes = body.len(),
            "write_fragment"
        );
        self.store.write(&store_key, body.to_string());
    }

    /// Produce `component`'s output, from the cache when possible.
    ///
    /// `render` runs the action and default render; it is skipped on a hit.
    pub fn fetch(
        &self,
        component: &mut ComponentInstance,
        render: impl FnOnce(&mut ComponentInstance) -> Result<()>,
    ) -> Result<()> {
        let key = match self.decide(component)? {
            CacheDecision::Bypass(reason) => {
                tracing::trace!("Fragment cache bypassed for {}: {:?}", component.component_name(), reason);
                return render(component);
            }
            CacheDecision::Lookup(key) => key,
        };

        if let Some(fragment) = self.read(component, &key) {
            component.set_response_body(fragment);
            return Ok(());
        }

        render(component)?;
        if let Some(body) = component.response_body() {
            self.write(component, &key, body);
        }
        Ok(())
    }
}
