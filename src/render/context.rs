//! The rendering context shared by a page render and the components it calls.

use anyhow::Result;
use serde_json::Value;

use super::Engine;
use super::options::{Block, RenderOptions};
use crate::constants::DEFAULT_ACTION;

/// Output buffers and engine access for one render session.
///
/// Buffers form a stack: [`with_output_buffer`](Self::with_output_buffer)
/// pushes a fresh buffer for the duration of a closure so that nested output
/// never leaks into the enclosing buffer.
pub struct ViewContext {
    engine: Engine,
    buffers: Vec<String>,
    depth: usize,
}

impl ViewContext {
    pub fn new(engine: Engine) -> Self {
        Self::nested(engine, 0)
    }

    pub(crate) fn nested(engine: Engine, depth: usize) -> Self {
        Self {
            engine,
            buffers: vec![String::new()],
            depth,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// How many component renders enclose this context.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Append text to the current output buffer.
    pub fn write(&mut self, text: &str) {
        if let Some(buffer) = self.buffers.last_mut() {
            buffer.push_str(text);
        }
    }

    /// Contents of the current output buffer.
    pub fn output(&self) -> &str {
        self.buffers.last().map(String::as_str).unwrap_or_default()
    }

    /// Take the current output buffer, leaving it empty.
    pub fn take_output(&mut self) -> String {
        self.buffers.last_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Run `f` against a fresh buffer; return what it wrote and its result.
    ///
    /// The enclosing buffer is restored whether or not `f` succeeds.
    pub fn with_output_buffer<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<(String, T)> {
        self.buffers.push(String::new());
        let result = f(self);
        let buffer = self.buffers.pop().unwrap_or_default();
        result.map(|value| (buffer, value))
    }

    /// Capture a block's content.
    ///
    /// The block runs inside a fresh buffer. If it wrote anything other than
    /// whitespace, the written text is the content; otherwise the block's
    /// return value is.
    pub fn capture(&mut self, block: &Block) -> Result<Value> {
        let (buffer, value) = self.with_output_buffer(|view| block.call(view))?;
        if buffer.trim().is_empty() {
            Ok(value)
        } else {
            Ok(Value::String(buffer))
        }
    }

    /// Render a component from this context and return its output.
    ///
    /// `options.action` selects the action (default `show`); `name` becomes the
    /// `component` option.
    pub fn component(&mut self, name: &str, mut options: RenderOptions) -> Result<String> {
        let action = options.action.take().unwrap_or_else(|| DEFAULT_ACTION.to_string());
        options.component = Some(name.to_string());
        let engine = self.engine.clone();
        engine.render_action(&action, self, options)
    }
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext").field("buffers", &self.buffers.len()).field("depth", &self.depth).finish()
    }
}
