//! Integration test suite for componentry
//!
//! End-to-end tests through the public render entry point and the CLI binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **rendering**: Dispatch, default templates, attributes and blocks
//! - **collections**: Collection renders and iteration metadata
//! - **caching**: Fragment cache hits, bypasses and invalidation
//! - **templates_on_disk**: File-system templates, `components.toml` and helpers
//! - **cli**: The `componentry` binary

mod caching;
mod collections;
mod templates_on_disk;
