//! Conversions between type names and symbolic component names.
//!
//! Type names use `::` separated CamelCase segments (`Admin::UserCardComponent`);
//! symbolic names use `/` separated snake_case (`admin/user_card_component`).

use crate::constants::{COMPONENT_MARKER, COMPONENT_SUFFIX, COMPONENT_TYPE_WORD};

/// Derive the component name from a type name.
///
/// Drops the module path, removes the first occurrence of `Component` and
/// converts the rest to snake_case: `Admin::UserCardComponent` → `user_card`.
pub fn component_name_from_type(type_name: &str) -> String {
    let base = demodulize(type_name);
    underscore(&base.replacen(COMPONENT_TYPE_WORD, "", 1))
}

/// Derive the registry type name a symbolic reference points at.
///
/// Appends `_component` unless the reference already mentions `component`,
/// then camelizes: `admin/user_card` → `Admin::UserCardComponent`.
pub fn type_name_for_reference(reference: &str) -> String {
    if reference.contains(COMPONENT_MARKER) {
        camelize(reference)
    } else {
        camelize(&format!("{reference}{COMPONENT_SUFFIX}"))
    }
}

/// The reference that resolves back to `type_name`, if there is one.
///
/// `Admin::UserCardComponent` → `admin/user_card`. Types whose name does not
/// end in `Component` cannot be reached by reference.
pub fn reference_for_type(type_name: &str) -> Option<String> {
    let underscored = underscore(type_name);
    let reference = underscored.strip_suffix(COMPONENT_SUFFIX).unwrap_or(&underscored);
    (!reference.is_empty() && type_name_for_reference(reference) == type_name).then(|| reference.to_string())
}

/// Last `::` segment of a type name.
pub fn demodulize(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// `user_card/item` → `UserCard::Item`
pub fn camelize(name: &str) -> String {
    name.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|word| !word.is_empty())
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// `Admin::HTMLCard` → `admin/html_card`
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.replace("::", "/").chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        if c == '-' {
            out.push('_');
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
