//! Fragment caching for component output.
//!
//! - [`FragmentStore`]: the pluggable key-value store ([`MemoryFragmentStore`])
//! - [`FragmentCache`]: the adapter wrapping each render with reads and writes
//! - [`FragmentKey`]: structured keys, namespaced under `components/` so they
//!   never collide with the host framework's own view fragments

mod fragment;
mod store;

pub use fragment::{BypassReason, CacheDecision, FragmentCache, FragmentKey, is_truthy, remap_namespace};
pub use store::{FragmentStats, FragmentStore, MemoryFragmentStore};
