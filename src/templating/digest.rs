//! Structural digests of templates, folded into fragment cache keys so that
//! editing a template invalidates every fragment rendered from it.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::lookup::TemplateLookup;
use crate::core::ComponentError;

/// Computes a content digest for the template `name` resolves to through `prefixes`.
///
/// `None` is a valid outcome: the cache adapter falls back to an identity-only key.
pub trait DigestProvider: Send + Sync {
    fn digest(&self, name: &str, prefixes: &[String]) -> Option<String>;
}

/// SHA-256 digest of the template normal lookup resolves to.
pub struct TemplateDigestor {
    templates: Arc<dyn TemplateLookup>,
}

impl TemplateDigestor {
    pub fn new(templates: Arc<dyn TemplateLookup>) -> Self {
        Self {
            templates,
        }
    }
}

impl DigestProvider for TemplateDigestor {
    fn digest(&self, name: &str, prefixes: &[String]) -> Option<String> {
        match self.templates.find(name, prefixes) {
            Ok(template) => Some(digest_source(&template.source)),
            Err(e) if matches!(e.downcast_ref::<ComponentError>(), Some(ComponentError::TemplateNotFound { .. })) => {
                tracing::trace!("No template for '{}', digest unavailable", name);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to load '{}' for digest: {:#}", name, e);
                None
            }
        }
    }
}

/// Digest in `sha256:<hex>` form.
pub fn digest_source(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
