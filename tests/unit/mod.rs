//! Unit test suite for componentry
//!
//! Exercises the public building blocks in isolation: attribute resolution,
//! naming conventions, render options and fragment keys.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod fragment_keys;
mod naming;
mod options;
