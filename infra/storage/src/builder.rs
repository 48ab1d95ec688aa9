use crate::container::{ContainerLookup, DirectoryContainers};
use crate::error::{StoreError, StoreErrorExt};
use crate::ids::{NanoIdGenerator, ObjectIdGenerator};
use crate::security::PathPolicy;
use crate::store::{ObjectStore, StoreInner};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
struct StoreConfig {
    create: bool,
    policy: PathPolicy,
    containers: Arc<dyn ContainerLookup>,
    ids: Arc<dyn ObjectIdGenerator>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            create: true,
            policy: PathPolicy::Lenient,
            containers: Arc::new(DirectoryContainers),
            ids: Arc::new(NanoIdGenerator),
        }
    }
}

#[derive(Debug, Default)]
pub struct NoBase;
#[derive(Debug)]
pub struct WithBase(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoBase {}
impl Sealed for WithBase {}

/// Configures an [`ObjectStore`]; it cannot connect before a base directory is set.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct ObjectStoreBuilder<S: Sealed = NoBase> {
    state: S,
    config: StoreConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> ObjectStoreBuilder<S> {
    #[must_use = "Sets whether the base directory should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    #[must_use = "Sets how object paths are vetted"]
    pub const fn path_policy(mut self, policy: PathPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    #[must_use = "Sets how object paths are vetted"]
    pub const fn strict_paths(self, enable: bool) -> Self {
        self.path_policy(if enable { PathPolicy::Strict } else { PathPolicy::Lenient })
    }

    #[must_use = "Replaces the container existence check"]
    pub fn containers(mut self, containers: impl ContainerLookup + 'static) -> Self {
        self.config.containers = Arc::new(containers);
        self
    }

    #[must_use = "Replaces the object ID generator"]
    pub fn id_generator(mut self, ids: impl ObjectIdGenerator + 'static) -> Self {
        self.config.ids = Arc::new(ids);
        self
    }

    fn transition<N: Sealed>(self, state: N) -> ObjectStoreBuilder<N> {
        ObjectStoreBuilder { state, config: self.config }
    }
}

impl ObjectStoreBuilder<NoBase> {
    #[must_use = "Creates a new object store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the directory all object paths are resolved against"]
    pub fn base_directory(self, path: impl Into<PathBuf>) -> ObjectStoreBuilder<WithBase> {
        self.transition(WithBase(path.into()))
    }
}

impl ObjectStoreBuilder<WithBase> {
    /// Consumes the configuration and opens the store.
    ///
    /// 1. Creates the base directory when `create(true)` (the default) is set.
    /// 2. Canonicalizes it, so every `fileName`/`metadataFileName` recorded later is absolute.
    /// 3. Removes staging files left behind by interrupted creates. Failures there are
    ///    logged and do not prevent startup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the base directory cannot be created or resolved.
    pub async fn connect(self) -> Result<ObjectStore, StoreError> {
        let base = &self.state.0;

        if self.config.create {
            fs::create_dir_all(base)
                .await
                .context(format!("Failed to bootstrap base directory: {}", base.display()))?;
        }

        let canonical = fs::canonicalize(base)
            .await
            .context(format!("Failed to resolve base directory: {}", base.display()))?;

        info!(path = %canonical.display(), policy = ?self.config.policy, "Object store opened");

        let store = ObjectStore {
            inner: Arc::new(StoreInner {
                base: canonical,
                policy: self.config.policy,
                containers: self.config.containers,
                ids: self.config.ids,
                staging_counter: AtomicU64::new(1),
            }),
        };

        store.purge_staging().await;

        Ok(store)
    }
}
