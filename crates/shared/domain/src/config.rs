use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the store and its front ends.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CdmiConfigInner {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
///
/// Deserializes through [`CdmiConfigInner`] rather than a flattened field, so loaders that
/// coerce string values (environment variables) reach the typed fields directly.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(from = "CdmiConfigInner")]
pub struct CdmiConfig {
    inner: Arc<CdmiConfigInner>,
}

impl From<CdmiConfigInner> for CdmiConfig {
    fn from(inner: CdmiConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for CdmiConfig {
    type Target = CdmiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for CdmiConfig {
    fn deref_mut(&mut self) -> &mut CdmiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Object store layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory every container path is resolved against.
    pub base_directory: PathBuf,
    /// Create the base directory on startup when it is missing.
    pub create: bool,
    /// Reject `.` and `..` path segments instead of passing them to the filesystem.
    pub strict_paths: bool,
}

/// Console / file logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Extra `EnvFilter` directives, e.g. `cdmi_storage=trace`.
    pub filter: Option<String>,
    pub console: bool,
    /// Directory for rolling log files; file logging is off when unset.
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for StorageConfig {
    fn default() -> Self {
        Self { base_directory: PathBuf::from("data"), create: true, strict_paths: false }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, console: true, directory: None, json: false }
    }
}
