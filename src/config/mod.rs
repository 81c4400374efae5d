//! Configuration for componentry.
//!
//! See [`EngineConfig`] for the file format and lookup order.

mod engine;

pub use engine::{ComponentDecl, EngineConfig, Environment, ResolutionPolicy};
