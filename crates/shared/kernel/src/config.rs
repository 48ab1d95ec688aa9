use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Base name of the configuration file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_NAME: &str = "cdmi";

/// Prefix of environment overrides (`CDMI__STORAGE__BASE_DIRECTORY` -> `storage.base_directory`).
pub const ENV_PREFIX: &str = "CDMI";

/// Custom error type for config loading.
#[cdmi_derive::cdmi_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest priority first:
/// 1. **Defaults**: whatever `T`'s `#[serde(default)]` provides.
/// 2. **File**: an explicit `path` must exist; without one, `cdmi.{toml,json,yaml,...}` in the
///    working directory is used if present.
/// 3. **Environment**: variables prefixed with `CDMI__`, nested with `__`.
///
/// # Errors
/// * An explicit configuration file is missing or unreadable.
/// * The merged sources do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use cdmi_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with(path, environment())
}

/// The `CDMI__` environment source used by [`load_config`].
#[must_use]
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake)
}

/// [`load_config`] with an explicit environment layer, e.g. one fed from a fixed map via
/// [`Environment::source`].
///
/// # Errors
/// Same as [`load_config`].
pub fn load_config_with<T>(
    path: Option<impl AsRef<Path>>,
    environment: Environment,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_NAME), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(environment);

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
