//! Error formatting utilities for componentry
//!
//! Converts internal errors into clear, actionable messages for the CLI.

use super::error::{ComponentError, ErrorContext};

/// Convert any error into a user-friendly format with contextual suggestions
///
/// Walks the error chain looking for a [`ComponentError`]; the outermost typed
/// error wins. Anything else is reported with its full chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(component_error) = error.downcast_ref::<ComponentError>() {
        let ctx = create_error_context(component_error);
        return match error.chain().nth(1) {
            Some(cause) if ctx.details.is_none() => ctx.with_details(cause.to_string()),
            _ => ctx,
        };
    }

    let mut current_error: &dyn std::error::Error = error.as_ref();
    loop {
        if let Some(component_error) = current_error.downcast_ref::<ComponentError>() {
            return create_error_context(component_error);
        }

        match current_error.source() {
            Some(source) => current_error = source,
            None => break,
        }
    }

    ErrorContext::new(error.to_string()).with_details(format!("{error:#}"))
}

/// Build the user-facing context for a typed error.
pub fn create_error_context(error: &ComponentError) -> ErrorContext {
    match error {
        ComponentError::UnresolvedComponent {
            suggestions,
            ..
        } => {
            let ctx = ErrorContext::new(error.to_string())
                .with_details("Strict resolution is enabled, so unknown names are not rendered through the base component");
            match suggestions.first() {
                Some(best) => ctx.with_suggestion(format!("Did you mean '{best}'?")),
                None => ctx.with_suggestion("Register the component type or check the name for typos"),
            }
        }
        ComponentError::MissingCacheKeyImplementation {
            ..
        } => ErrorContext::new(error.to_string())
            .with_details("Caching is enabled and the component uses the default cache key")
            .with_suggestion("Give the component a cache key, or disable caching with perform_caching = false"),
        ComponentError::TemplateNotFound {
            searched,
            ..
        } => ErrorContext::new(error.to_string())
            .with_details(format!("Searched: {}", searched.join(", ")))
            .with_suggestion("Create the template under one of the searched paths"),
        ComponentError::TemplateSyntax {
            suggestions,
            ..
        } => {
            let ctx = ErrorContext::new(error.to_string());
            if suggestions.is_empty() {
                ctx.with_suggestion("Check your template syntax and variable names")
            } else {
                ctx.with_suggestion(format!("Similar variables: {}", suggestions.join(", ")))
            }
        }
        ComponentError::CollectionElementFailed {
            ..
        } => ErrorContext::new(error.to_string())
            .with_suggestion("Inspect the element data; collection renders stop at the first failure"),
        ComponentError::DoubleRender {
            ..
        } => ErrorContext::new(error.to_string())
            .with_suggestion("Render only once per action, or return early after rendering"),
        ComponentError::RenderDepthExceeded {
            ..
        } => ErrorContext::new(error.to_string())
            .with_suggestion("Check for components that render themselves, or raise max_render_depth"),
        ComponentError::ConfigError {
            ..
        } => ErrorContext::new(error.to_string())
            .with_suggestion("Check components.toml or the file named by COMPONENTRY_CONFIG_PATH"),
    }
}
