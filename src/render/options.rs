//! Call-site render options.

use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use super::context::ViewContext;
use super::iteration::IterationMetadata;
use crate::component::Attributes;
use crate::constants::RESERVED_OPTION_KEYS;

/// A caller-supplied content block.
///
/// A block may write into the view's output buffer, return a value, or both;
/// see [`ViewContext::capture`] for how the two are reconciled.
#[derive(Clone)]
pub struct Block(Rc<dyn Fn(&mut ViewContext) -> Result<Value>>);

impl Block {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut ViewContext) -> Result<Value> + 'static,
    {
        Self(Rc::new(f))
    }

    /// A template-style block that writes `text` into the output buffer.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |view| {
            view.write(&text);
            Ok(Value::Null)
        })
    }

    /// A block that returns `value` without writing anything.
    pub fn value(value: Value) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    pub fn call(&self, view: &mut ViewContext) -> Result<Value> {
        (self.0)(view)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block(..)")
    }
}

/// Everything a caller passes to a render.
///
/// The reserved keys (`action`, `component`, `object`, `collection`, `block`
/// and the internal `collection_iteration`) are held in their own fields and
/// never appear in [`attributes`](Self::attributes).
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub component: Option<String>,
    pub action: Option<String>,
    pub object: Option<Value>,
    pub collection: Option<Vec<Value>>,
    pub block: Option<Block>,
    pub collection_iteration: Option<IterationMetadata>,
    pub attributes: Attributes,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split an open option map into reserved fields and attributes.
    ///
    /// A string `block` becomes a block returning that string. A non-array
    /// `collection` is treated as a one-element collection; `null` as none.
    pub fn from_map<I>(map: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "component" => options.component = value_to_name(value),
                "action" => options.action = value_to_name(value),
                "object" => options.object = Some(value),
                "collection" => {
                    options.collection = match value {
                        Value::Null => None,
                        Value::Array(items) => Some(items),
                        other => Some(vec![other]),
                    }
                }
                "block" => {
                    if !value.is_null() {
                        options.block = Some(Block::value(value));
                    }
                }
                key if RESERVED_OPTION_KEYS.contains(&key) => {}
                _ => {
                    options.attributes.insert(key, value);
                }
            }
        }
        options
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn object(mut self, object: Value) -> Self {
        self.object = Some(object);
        self
    }

    pub fn collection(mut self, items: Vec<Value>) -> Self {
        self.collection = Some(items);
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    /// Set one attribute override. Reserved keys are routed to their fields.
    pub fn attr(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        if RESERVED_OPTION_KEYS.contains(&name.as_str()) {
            let reserved = Self::from_map([(name, value)]);
            self.merge_reserved(reserved);
        } else {
            self.attributes.insert(name, value);
        }
        self
    }

    fn merge_reserved(&mut self, other: Self) {
        self.component = other.component.or(self.component.take());
        self.action = other.action.or(self.action.take());
        self.object = other.object.or(self.object.take());
        self.collection = other.collection.or(self.collection.take());
        self.block = other.block.or(self.block.take());
    }
}

fn value_to_name(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
