//! componentry - server-side view components
//!
//! A component is a self-contained unit of view logic: a type with declared
//! attributes, actions and templates, invoked by name from other templates or
//! from application code.
//!
//! # Architecture Overview
//!
//! A render call flows through a small pipeline:
//!
//! 1. **Dispatch** ([`render::Engine`]): resolve the symbolic reference to a
//!    component type through the [`component::ComponentRegistry`], falling back
//!    to the generic base component for unknown names
//! 2. **Instantiate** ([`component::ComponentInstance`]): resolve attributes
//!    (declared defaults, class defaults, call-site overrides) and capture the
//!    caller's block
//! 3. **Cache** ([`cache::FragmentCache`]): cacheable components are looked up
//!    by a fragment key built from the template digest and the cache key
//! 4. **Render**: run the action, then render the default template
//!    (`<component>/<action>`) through the inherited prefix list if the action
//!    did not render itself
//!
//! Collections render once per element with [`render::IterationMetadata`]
//! describing the element's position.
//!
//! # Core Modules
//!
//! - [`component`] - Component types, instances, attributes and naming
//! - [`render`] - The dispatcher, render options and output buffers
//! - [`cache`] - Fragment keys, the cache decision and fragment stores
//! - [`templating`] - Template lookup, digests and Tera rendering
//! - [`helpers`] - Component helper functions available inside templates
//! - [`config`] - Engine configuration (`components.toml`)
//! - [`core`] - Error types and user-facing error formatting
//! - [`cli`] - The `componentry` command line
//!
//! # Example
//!
//! ```rust
//! use componentry::component::ComponentClass;
//! use componentry::render::{Engine, RenderOptions};
//! use componentry::templating::MemoryTemplates;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let templates = MemoryTemplates::new().with_template("greeting/show", "Hello, {{ name }}!");
//! let greeting = ComponentClass::builder("GreetingComponent")
//!     .attribute("name", json!("world"))
//!     .cache_key(|component| Ok(json!([component.attribute("name")])))
//!     .build();
//!
//! let engine = Engine::builder().templates(Arc::new(templates)).component(greeting).build()?;
//!
//! assert_eq!(engine.render("greeting", RenderOptions::new())?, "Hello, world!");
//! assert_eq!(engine.render("greeting", RenderOptions::new().attr("name", json!("Ada")))?, "Hello, Ada!");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod component;
pub mod config;
pub mod constants;
pub mod core;
pub mod helpers;
pub mod render;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
