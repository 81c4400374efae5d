//! Template collaborators consumed by the render core.
//!
//! - [`TemplateLookup`]: resolves a name against a prefix list
//!   ([`MemoryTemplates`], [`FileSystemTemplates`])
//! - [`TemplateRenderer`]: renders a resolved template with Tera
//! - [`DigestProvider`]: structural digest of a template for cache keys
//!   ([`TemplateDigestor`])
//!
//! Templates use Tera syntax. Component templates see the resolved attributes
//! as top-level variables, plus `object`, `block_content`, `action_name`,
//! `component_name` and, inside a collection, `collection_iteration`.

mod digest;
mod lookup;
mod renderer;

pub use digest::{DigestProvider, TemplateDigestor, digest_source};
pub use lookup::{FileSystemTemplates, MemoryTemplates, Template, TemplateLookup, candidate_paths};
pub use renderer::TemplateRenderer;
