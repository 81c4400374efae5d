//! Error handling for componentry
//!
//! The render core surfaces failures through two layers:
//! 1. [`ComponentError`], a strongly-typed enumeration of every failure mode the
//!    dispatcher, the cache adapter and the template layer can raise
//! 2. [`ErrorContext`], a wrapper adding user-facing details and suggestions,
//!    used by the CLI when printing errors
//!
//! Public render operations return [`anyhow::Result`]. The typed error is always
//! recoverable with `downcast_ref::<ComponentError>()`, including through
//! context layers added while rendering collections.
//!
//! # Examples
//!
//! ```rust,no_run
//! use componentry::core::{ComponentError, user_friendly_error};
//!
//! let error = anyhow::Error::from(ComponentError::TemplateNotFound {
//!     name: "show".to_string(),
//!     searched: vec!["card/show".to_string()],
//! });
//!
//! let ctx = user_friendly_error(error);
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for component rendering.
///
/// # Error Categories
///
/// ## Resolution
/// - [`UnresolvedComponent`] - symbolic reference matches no registered type
///   (only raised under [`ResolutionPolicy::Strict`](crate::config::ResolutionPolicy::Strict))
///
/// ## Caching
/// - [`MissingCacheKeyImplementation`] - a caching component relies on the default cache key
///
/// ## Templates
/// - [`TemplateNotFound`] - no template matched the name and prefix list
/// - [`TemplateSyntax`] - the template engine rejected or failed to render a template
///
/// ## Render pipeline
/// - [`CollectionElementFailed`] - one element of a collection render failed
/// - [`DoubleRender`] - an action rendered more than once
/// - [`RenderDepthExceeded`] - nested component renders went too deep
///
/// [`UnresolvedComponent`]: ComponentError::UnresolvedComponent
/// [`MissingCacheKeyImplementation`]: ComponentError::MissingCacheKeyImplementation
/// [`TemplateNotFound`]: ComponentError::TemplateNotFound
/// [`TemplateSyntax`]: ComponentError::TemplateSyntax
/// [`CollectionElementFailed`]: ComponentError::CollectionElementFailed
/// [`DoubleRender`]: ComponentError::DoubleRender
/// [`RenderDepthExceeded`]: ComponentError::RenderDepthExceeded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// A symbolic component reference could not be mapped to a registered type.
    #[error("Component '{name}' could not be resolved")]
    UnresolvedComponent {
        /// The symbolic reference as given by the caller
        name: String,
        /// Registered component names close to the requested one
        suggestions: Vec<String>,
    },

    /// The default cache key was used by a component that takes part in caching.
    #[error("Component '{component}' must implement a cache key to be cached")]
    MissingCacheKeyImplementation {
        /// Name of the component missing a cache key
        component: String,
    },

    /// Template lookup found nothing for the given name.
    #[error("Template '{name}' not found")]
    TemplateNotFound {
        /// Requested template name
        name: String,
        /// Every path that was tried, in lookup order
        searched: Vec<String>,
    },

    /// The template engine failed to parse or render a template.
    #[error("Template error in '{template}': {message}")]
    TemplateSyntax {
        /// Identity of the failing template
        template: String,
        /// Cleaned-up engine message
        message: String,
        /// Similar variable names when the failure was an undefined variable
        suggestions: Vec<String>,
    },

    /// Rendering one element of a collection failed; the whole collection is aborted.
    #[error("Failed to render collection element {index} of {size}")]
    CollectionElementFailed {
        /// Zero-based position of the failing element
        index: usize,
        /// Number of elements in the collection
        size: usize,
    },

    /// An action produced output twice.
    #[error("Component '{component}' rendered more than once in action '{action}'")]
    DoubleRender {
        /// Component name
        component: String,
        /// Action that rendered twice
        action: String,
    },

    /// Nested component rendering exceeded the configured depth.
    #[error("Component nesting exceeded the maximum depth of {depth}")]
    RenderDepthExceeded {
        /// The configured limit that was hit
        depth: usize,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information.
///
/// Printed by the CLI with colours: the error in red, details in yellow and the
/// suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// Headline message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

pub use super::error_formatting::{create_error_context, user_friendly_error};
