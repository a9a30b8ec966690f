//! Dispatcher configuration
//!
//! Configuration is optional: every field has a default, and a dispatcher
//! built with [`Dispatcher::new`](crate::Dispatcher::new) uses
//! [`DispatcherConfig::default`]. Configuration files are YAML documents with
//! a top-level `dispatcher` key:
//!
//! ```yaml
//! dispatcher:
//!   name: "build"
//!   catch_panics: true
//!   slow_hook_threshold_ms: 250
//! ```

pub mod loader;
pub mod validator;

pub use loader::ConfigLoader;
pub use validator::ConfigValidator;

use serde::{Deserialize, Serialize};

/// Name used when none is configured
pub const DEFAULT_DISPATCHER_NAME: &str = "hooks";

/// Runtime settings of a dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Label attached to every log line of the dispatcher
    pub name: String,

    /// Turn forward handler panics into `TriggerError::Executing`
    ///
    /// When disabled a panicking forward handler unwinds through `trigger`.
    /// Error handler panics are always caught and reported as faults.
    pub catch_panics: bool,

    /// Warn when a hook takes longer than this many milliseconds
    pub slow_hook_threshold_ms: Option<u64>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DISPATCHER_NAME.to_string(),
            catch_panics: true,
            slow_hook_threshold_ms: None,
        }
    }
}

impl DispatcherConfig {
    /// Default configuration under another name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
