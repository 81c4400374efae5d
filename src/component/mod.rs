//! Component types, instances and attribute resolution.
//!
//! # Defining a component
//!
//! ```rust,no_run
//! use componentry::component::ComponentClass;
//! use serde_json::json;
//!
//! let card = ComponentClass::builder("CardComponent")
//!     .attribute("title", json!("Untitled"))
//!     .action("show", |component, view| {
//!         component.render_inline(view, "<h2>{{ title }}</h2>")
//!     })
//!     .cache_key(|component| Ok(component.attribute("title").cloned().unwrap_or_default()))
//!     .build();
//!
//! assert_eq!(card.component_name(), "card");
//! assert_eq!(card.prefixes(), ["card".to_string(), "application".to_string()]);
//! ```

pub mod attributes;
mod class;
pub mod declared;
mod instance;
pub mod naming;
mod registry;

pub use attributes::{Attributes, resolve};
pub use class::{ActionFn, CacheKeyFn, ComponentClass, ComponentClassBuilder};
pub use instance::ComponentInstance;
pub use registry::ComponentRegistry;
