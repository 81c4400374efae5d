//! Attribute resolution.
//!
//! Attributes are an open key → value mapping. Resolution layers three maps,
//! later layers winning on key collision:
//!
//! 1. attribute defaults declared on the class (and its ancestors)
//! 2. class-level instance defaults
//! 3. caller overrides
//!
//! Override keys are not validated against the declarations: unknown keys
//! pass through untouched.

use serde_json::Value;
use std::collections::BTreeMap;

/// Resolved or partial attribute set.
pub type Attributes = BTreeMap<String, Value>;

/// Merge the three attribute layers; caller overrides always win.
pub fn resolve(declared: &Attributes, instance_defaults: &Attributes, overrides: &Attributes) -> Attributes {
    let mut resolved = declared.clone();
    resolved.extend(instance_defaults.iter().map(|(k, v)| (k.clone(), v.clone())));
    resolved.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    resolved
}
