//! Test utilities for componentry.
//!
//! Shared by the crate's unit tests and the `tests/` targets (enabled there
//! through the `test-utils` feature):
//!
//! - [`init_test_logging`] - one-time tracing setup
//! - [`TemplateFixture`] - a temporary template root on disk
//! - [`memory_engine`] - an engine builder over in-memory templates
//! - [`counting_action`] - an action that counts its executions
//! - [`RecordingStore`] - a fragment store that logs every operation

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once, PoisonError};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::cache::{FragmentStore, MemoryFragmentStore};
use crate::component::ComponentInstance;
use crate::config::EngineConfig;
use crate::render::{Engine, EngineBuilder, ViewContext};
use crate::templating::MemoryTemplates;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=components=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// An engine builder over in-memory templates, plus the template store.
///
/// Templates inserted into the returned store after build are visible to the
/// engine, which lets tests edit a template between renders.
pub fn memory_engine(templates: &[(&str, &str)]) -> (EngineBuilder, Arc<MemoryTemplates>) {
    let store = Arc::new(MemoryTemplates::new());
    for (path, source) in templates {
        store.insert(*path, *source);
    }
    let builder = Engine::builder().templates(store.clone());
    (builder, store)
}

/// An action that increments `counter` and leaves rendering to the default template.
pub fn counting_action(
    counter: Arc<AtomicUsize>,
) -> impl Fn(&mut ComponentInstance, &mut ViewContext) -> Result<()> + Send + Sync + 'static {
    move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// One operation seen by a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Read {
        key: String,
        hit: bool,
    },
    Write {
        key: String,
    },
    Delete {
        key: String,
    },
}

/// A [`MemoryFragmentStore`] that records every operation in order.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryFragmentStore,
    ops: Mutex<Vec<StoreOp>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations so far, oldest first.
    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, op: StoreOp) {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner).push(op);
    }
}

impl FragmentStore for RecordingStore {
    fn read(&self, key: &str) -> Option<String> {
        let value = self.inner.read(key);
        self.record(StoreOp::Read {
            key: key.to_string(),
            hit: value.is_some(),
        });
        value
    }

    fn write(&self, key: &str, value: String) {
        self.record(StoreOp::Write {
            key: key.to_string(),
        });
        self.inner.write(key, value);
    }

    fn delete(&self, key: &str) -> bool {
        self.record(StoreOp::Delete {
            key: key.to_string(),
        });
        self.inner.delete(key)
    }
}

/// A temporary directory laid out as a template root.
pub struct TemplateFixture {
    temp_dir: TempDir,
}

impl TemplateFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    /// The template root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `<root>/<virtual_path>.tera`.
    pub fn template(&self, virtual_path: &str, source: &str) -> Result<PathBuf> {
        let path = self.root().join(format!("{virtual_path}.tera"));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, source).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write `components.toml` at the root and return its path.
    pub fn config(&self, config: &EngineConfig) -> Result<PathBuf> {
        let path = self.root().join("components.toml");
        config.save_to(&path)?;
        Ok(path)
    }

    /// An engine configuration rooted at this fixture.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            template_root: Some(self.root().to_path_buf()),
            ..EngineConfig::default()
        }
    }
}
