//! Template rendering engine with Tera.
//!
//! Wraps Tera with component-specific configuration: a fresh Tera instance per
//! render with the caller's helper functions registered, and structured errors.

use regex::Regex;
use tera::{Context as TeraContext, Tera};

use super::lookup::Template;
use crate::core::ComponentError;
use crate::utils::find_similar;

/// Renders resolved templates with Tera.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    /// Escape HTML in `{{ }}` interpolations
    autoescape: bool,
}

impl TemplateRenderer {
    pub fn new(autoescape: bool) -> Self {
        Self {
            autoescape,
        }
    }

    /// Render `template` with `context`.
    ///
    /// `register` is called on the fresh Tera instance before the template is
    /// added, so it can install helper functions (nested component calls).
    pub fn render(
        &self,
        template: &Template,
        context: &TeraContext,
        register: &dyn Fn(&mut Tera),
    ) -> Result<String, ComponentError> {
        tracing::debug!("Rendering template '{}'", template.identity);

        // Fresh instance per render: templates and helpers never leak between renders
        let mut tera = Tera::default();
        if self.autoescape {
            tera.autoescape_on(vec![""]);
        } else {
            tera.autoescape_on(vec![]);
        }
        register(&mut tera);

        tera.add_raw_template(&template.identity, &template.source)
            .map_err(|e| Self::parse_tera_error(&e, &template.identity, context))?;

        tera.render(&template.identity, context)
            .map_err(|e| Self::parse_tera_error(&e, &template.identity, context))
    }

    /// Parse a Tera error into a structured [`ComponentError`]
    fn parse_tera_error(
        error: &tera::Error,
        identity: &str,
        context: &TeraContext,
    ) -> ComponentError {
        let message = Self::format_tera_error(error);

        let suggestions = match Self::extract_variable_name(&message) {
            Some(name) => find_similar(&name, &Self::available_variables(context)),
            None => Vec::new(),
        };

        ComponentError::TemplateSyntax {
            template: identity.to_string(),
            message,
            suggestions,
        }
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        re.captures(error_msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
    }

    /// Top-level keys of the render context
    fn available_variables(context: &TeraContext) -> Vec<String> {
        match context.clone().into_json() {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Walk the Tera error chain and join the useful messages.
    ///
    /// Wrapper messages like "Failed to render 'x'" are dropped because the
    /// template identity is reported separately.
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut all_messages = vec![error.to_string()];
        let mut current_error: Option<&dyn Error> = error.source();
        while let Some(err) = current_error {
            all_messages.push(err.to_string());
            current_error = err.source();
        }

        let messages: Vec<String> = all_messages
            .into_iter()
            .map(|msg| msg.trim().to_string())
            .filter(|msg| {
                !msg.is_empty()
                    && !(msg.starts_with("Failed to render '") && msg.ends_with('\''))
                    && !(msg.starts_with("Failed to parse '") && msg.ends_with('\''))
            })
            .collect();

        if messages.is_empty() {
            "Template syntax error".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}
