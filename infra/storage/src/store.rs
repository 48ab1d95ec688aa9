//! The data-object store: create and look up objects by path.
//!
//! Each object is a pair of files inside its container directory:
//!
//! ```text
//! <base>/<container>/<name>     raw value
//! <base>/<container>/.<name>    JSON metadata document
//! ```
//!
//! Nothing is cached between calls; every operation goes back to the filesystem.

use crate::builder::ObjectStoreBuilder;
use crate::codec;
use crate::container::ContainerLookup;
use crate::error::{StoreError, StoreErrorExt};
use crate::ids::ObjectIdGenerator;
use crate::maintenance;
use crate::object::{DataObject, DataObjectDraft};
use crate::path::{ObjectLocation, ObjectPath};
use crate::publish;
use crate::security::PathPolicy;
use cdmi_domain::constants::{DEFAULT_MIMETYPE, OBJECT_ID_LENGTH};
use cdmi_domain::config::StorageConfig;
use cdmi_domain::operations::{Operation, OperationSet};
use chrono::{Local, NaiveDateTime, SubsecRound};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::{debug, trace};

/// The internal shared state of an [`ObjectStore`].
#[derive(Debug)]
pub struct StoreInner {
    /// Canonical base directory every object path is resolved against.
    pub(crate) base: PathBuf,
    pub(crate) policy: PathPolicy,
    pub(crate) containers: Arc<dyn ContainerLookup>,
    pub(crate) ids: Arc<dyn ObjectIdGenerator>,
    /// Source of unique staging file names.
    pub(crate) staging_counter: AtomicU64,
}

/// A cheap-to-clone handle to the filesystem object store.
///
/// The store keeps no locks and no cache. Two concurrent creates of the same path are
/// settled by the filesystem: exactly one wins, the other gets [`StoreError::Conflict`].
///
/// # Example
///
/// ```rust
/// use cdmi_storage::{DataObjectDraft, ObjectStore, StoreError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StoreError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let base = tmp.path().join("cdmi");
///     let store = ObjectStore::builder().base_directory(&base).connect().await?;
///     # std::fs::create_dir(base.join("docs")).unwrap();
///
///     let created = store
///         .create_by_path("docs/readme.txt", DataObjectDraft::new("hello"))
///         .await?;
///     assert_eq!(created.metadata().size(), 5);
///
///     let found = store.find_by_path("docs/readme.txt").await?.expect("object exists");
///     assert_eq!(found.value(), "hello");
///     assert_eq!(found.object_id(), created.object_id());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ObjectStore {
    pub(crate) inner: Arc<StoreInner>,
}

impl Deref for ObjectStore {
    type Target = StoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl ObjectStore {
    #[must_use = "The object store is not opened until you call .connect()"]
    pub fn builder() -> ObjectStoreBuilder {
        ObjectStoreBuilder::new()
    }

    /// Opens a store with the default collaborators from configuration.
    ///
    /// # Errors
    ///
    /// See [`ObjectStoreBuilder::connect`].
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StoreError> {
        Self::builder()
            .base_directory(&config.base_directory)
            .create(config.create)
            .strict_paths(config.strict_paths)
            .connect()
            .await
    }

    /// Canonical base directory.
    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base
    }

    /// Operations this store implements.
    #[must_use]
    pub const fn capabilities(&self) -> OperationSet {
        OperationSet::BY_PATH
    }

    #[must_use]
    pub fn supports(&self, op: Operation) -> bool {
        self.capabilities().supports(op)
    }

    pub fn supported_operations(&self) -> impl Iterator<Item = Operation> {
        self.capabilities().operations()
    }

    /// Resolves where the files of `path` live, without touching them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedRequest`] for a path without segments and
    /// [`StoreError::PathTraversalAttempt`] for relative segments under the strict policy.
    pub fn locate(&self, path: &str) -> Result<ObjectLocation, StoreError> {
        let object_path = ObjectPath::parse(path)?;
        self.policy.check_segments(&object_path)?;
        Ok(object_path.locate(&self.base))
    }

    /// Creates a CDMI object at `path`.
    ///
    /// The MIME type comes from the draft, `text/plain` when it has none. An object ID is
    /// generated when the draft carries none.
    ///
    /// # Errors
    ///
    /// * [`StoreError::MalformedRequest`] for a path without segments.
    /// * [`StoreError::Conflict`] when the container is missing or the object exists.
    /// * [`StoreError::Io`] / [`StoreError::Format`] when the files cannot be written.
    pub async fn create_by_path(
        &self,
        path: &str,
        draft: DataObjectDraft,
    ) -> Result<DataObject, StoreError> {
        let mimetype = draft.mimetype.clone().unwrap_or_else(|| DEFAULT_MIMETYPE.to_owned());
        self.create(path, draft, mimetype).await
    }

    /// Creates an object from a non-CDMI request.
    ///
    /// Identical to [`ObjectStore::create_by_path`] except that `content_type` always wins
    /// over the draft's MIME type.
    ///
    /// # Errors
    ///
    /// Same as [`ObjectStore::create_by_path`].
    pub async fn create_non_cdmi_by_path(
        &self,
        path: &str,
        content_type: &str,
        draft: DataObjectDraft,
    ) -> Result<DataObject, StoreError> {
        trace!(path, content_type, "Non-CDMI create");
        self.create(path, draft, content_type.to_owned()).await
    }

    async fn create(
        &self,
        path: &str,
        draft: DataObjectDraft,
        mimetype: String,
    ) -> Result<DataObject, StoreError> {
        let location = self.locate(path)?;
        trace!(
            container = %location.container_dir.display(),
            content = %location.content_file.display(),
            metadata = %location.metadata_file.display(),
            "Resolved object location"
        );

        if !self.container_exists(&location.container_dir).await? {
            return Err(StoreError::conflict(format!(
                "Container <{}> doesn't exist",
                location.container_dir.display()
            )));
        }
        self.policy.check_container(&self.base, &location.container_dir).await?;

        if fs::try_exists(&location.content_file)
            .await
            .context(format!("Cannot write object @{path}"))?
        {
            return Err(StoreError::conflict(format!(
                "Object file <{}> exists",
                location.content_file.display()
            )));
        }

        let object_id = match &draft.object_id {
            Some(id) => id.clone(),
            None => self.ids.generate(OBJECT_ID_LENGTH),
        };
        let object = DataObject::assemble(draft, object_id, mimetype, &location, now());

        let document = codec::encode(&object).context(format!("Cannot write object @{path}"))?;
        publish::publish(&location, object.value().as_bytes(), &document, &self.staging_counter)
            .await
            .context(format!("Cannot write object @{path}"))?;

        debug!(path, object_id = object.object_id(), size = object.metadata().size(), "Object created");
        Ok(object)
    }

    /// Looks up the object stored at `path`.
    ///
    /// Returns `Ok(None)` when no metadata file exists. The returned object's `cdmi_atime` is
    /// set to the time of this read; the sidecar file on disk keeps its previous value.
    ///
    /// # Errors
    ///
    /// * [`StoreError::MalformedRequest`] for a path without segments.
    /// * [`StoreError::Conflict`] when the metadata file exists but the content file does not.
    /// * [`StoreError::PathTraversalAttempt`] under the strict policy when the container
    ///   resolves outside the base directory.
    /// * [`StoreError::Io`] / [`StoreError::Format`] when either file cannot be read or parsed.
    pub async fn find_by_path(&self, path: &str) -> Result<Option<DataObject>, StoreError> {
        let location = self.locate(path)?;
        let read_context = || format!("Cannot read object @{path}");

        if !fs::try_exists(&location.metadata_file).await.context(read_context())? {
            debug!(path, "No metadata file, object not found");
            return Ok(None);
        }
        self.policy.check_container(&self.base, &location.container_dir).await?;

        if !fs::try_exists(&location.content_file).await.context(read_context())? {
            return Err(StoreError::conflict(format!(
                "Object file <{}> doesn't exist",
                location.content_file.display()
            )));
        }

        let document = fs::read(&location.metadata_file).await.context(read_context())?;
        let mut object = codec::decode(&document).context(read_context())?;

        let content = fs::read(&location.content_file).await.context(read_context())?;
        object.set_value(String::from_utf8_lossy(&content).into_owned());
        object.touch(now());

        debug!(path, object_id = object.object_id(), "Object read");
        Ok(Some(object))
    }

    async fn container_exists(&self, container_dir: &Path) -> Result<bool, StoreError> {
        let containers = Arc::clone(&self.containers);
        let dir = container_dir.to_path_buf();

        tokio::task::spawn_blocking(move || containers.exists(&dir)).await.map_err(|e| {
            StoreError::Io {
                source: std::io::Error::other(e),
                context: Some(
                    format!("Container lookup failed: {}", container_dir.display()).into(),
                ),
            }
        })
    }

    /// Not supported: objects are addressed by path only.
    ///
    /// # Errors
    ///
    /// Always [`StoreError::Unsupported`].
    #[allow(clippy::unused_async)]
    pub async fn create_by_id(
        &self,
        _object_id: &str,
        _draft: DataObjectDraft,
    ) -> Result<DataObject, StoreError> {
        Err(StoreError::unsupported(Operation::CreateById))
    }

    /// Not supported.
    ///
    /// # Errors
    ///
    /// Always [`StoreError::Unsupported`].
    #[allow(clippy::unused_async)]
    pub async fn delete_by_path(&self, _path: &str) -> Result<(), StoreError> {
        Err(StoreError::unsupported(Operation::DeleteByPath))
    }

    /// Not supported: there is no object ID index.
    ///
    /// # Errors
    ///
    /// Always [`StoreError::Unsupported`].
    #[allow(clippy::unused_async)]
    pub async fn find_by_object_id(
        &self,
        _object_id: &str,
    ) -> Result<Option<DataObject>, StoreError> {
        Err(StoreError::unsupported(Operation::FindByObjectId))
    }

    /// Removes staging files abandoned by interrupted creates.
    pub async fn purge_staging(&self) {
        maintenance::purge_staging(&self.base).await;
    }
}

/// Local wall-clock time at second precision, matching the stored timestamp format.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
