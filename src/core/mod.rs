//! Core types for componentry
//!
//! The error taxonomy shared by every layer of the render pipeline, and the
//! user-facing formatting used by the CLI.

pub mod error;
mod error_formatting;

pub use error::{ComponentError, ErrorContext, create_error_context, user_friendly_error};
