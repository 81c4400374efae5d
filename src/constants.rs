//! Global constants used throughout the componentry codebase.
//!
//! Naming conventions, reserved option keys and cache namespaces live here so
//! that the dispatcher, the cache adapter and the CLI agree on them.

/// Suffix appended to a symbolic component reference before type lookup.
pub const COMPONENT_SUFFIX: &str = "_component";

/// Marker searched for in a symbolic reference to decide whether the suffix is already present.
pub const COMPONENT_MARKER: &str = "component";

/// Word stripped from a type name when deriving its component name.
pub const COMPONENT_TYPE_WORD: &str = "Component";

/// Action invoked when the caller does not name one.
pub const DEFAULT_ACTION: &str = "show";

/// Component path of the generic base component.
pub const BASE_COMPONENT_PATH: &str = "application";

/// Type name of the generic base component.
pub const BASE_COMPONENT_TYPE: &str = "Component";

/// Namespace the host framework uses for its own view fragments.
pub const VIEWS_NAMESPACE: &str = "views";

/// Namespace component fragments are stored under.
pub const COMPONENTS_NAMESPACE: &str = "components";

/// Target used for cache instrumentation events.
pub const INSTRUMENT_TARGET: &str = "components";

/// Option keys that never reach attribute resolution.
pub const RESERVED_OPTION_KEYS: &[&str] =
    &["action", "component", "object", "collection", "block", "collection_iteration"];

/// Default maximum nesting of component renders within templates.
pub const DEFAULT_MAX_RENDER_DEPTH: usize = 32;

/// Default template file extension for [`crate::templating::FileSystemTemplates`].
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "tera";

/// Directories under the template root that never become component helpers.
pub const IGNORED_COMPONENT_DIRS: &[&str] = &["concerns"];

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "components.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "COMPONENTRY_CONFIG_PATH";
