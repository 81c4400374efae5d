//! Type registry mapping type names to component classes.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::class::ComponentClass;
use super::naming::{reference_for_type, type_name_for_reference};
use crate::config::ResolutionPolicy;
use crate::core::ComponentError;
use crate::utils::find_similar;

/// Registered component types, keyed by type name.
///
/// Registration happens while the application defines its components;
/// renders only read.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    classes: RwLock<HashMap<String, Arc<ComponentClass>>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or redefine) a class under its type name.
    pub fn register(&self, class: Arc<ComponentClass>) {
        tracing::debug!("Registering component type {}", class.type_name());
        self.classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class.type_name().to_string(), class);
    }

    /// Look up a class by exact type name.
    pub fn get(&self, type_name: &str) -> Option<Arc<ComponentClass>> {
        self.classes.read().unwrap_or_else(PoisonError::into_inner).get(type_name).cloned()
    }

    /// Symbolic names of every registered class, sorted.
    pub fn component_names(&self) -> Vec<String> {
        let classes = self.classes.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> =
            classes.values().map(|class| class.component_name().to_string()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// References that resolve to a registered class, sorted.
    pub fn references(&self) -> Vec<String> {
        let classes = self.classes.read().unwrap_or_else(PoisonError::into_inner);
        let mut references: Vec<String> = classes.keys().filter_map(|name| reference_for_type(name)).collect();
        references.sort();
        references
    }

    /// Resolve a symbolic reference to a class.
    ///
    /// No reference resolves to the base class. An unknown reference resolves
    /// to the base class under [`ResolutionPolicy::Fallback`] and fails with
    /// [`ComponentError::UnresolvedComponent`] under [`ResolutionPolicy::Strict`].
    pub fn resolve(
        &self,
        reference: Option<&str>,
        policy: ResolutionPolicy,
    ) -> Result<Arc<ComponentClass>, ComponentError> {
        let Some(reference) = reference else {
            return Ok(ComponentClass::base());
        };

        let type_name = type_name_for_reference(reference);
        if let Some(class) = self.get(&type_name) {
            tracing::trace!("Resolved component '{}' to {}", reference, type_name);
            return Ok(class);
        }

        match policy {
            ResolutionPolicy::Fallback => {
                tracing::warn!(
                    "Component type {} not found for '{}', rendering with the base component",
                    type_name,
                    reference
                );
                Ok(ComponentClass::base())
            }
            ResolutionPolicy::Strict => Err(ComponentError::UnresolvedComponent {
                name: reference.to_string(),
                suggestions: find_similar(reference, &self.references()),
            }),
        }
    }
}
