//! A filesystem-backed CDMI data-object store.
//!
//! Every object lives as two sibling files inside a container directory: the raw value under
//! the object's name, and a JSON metadata document under the same name with a leading dot.
//!
//! # Core Features
//!
//! - **Path resolution**: `docs/guides/readme.txt` maps to container `docs/guides/` and
//!   object `readme.txt`, always beneath the configured base directory.
//! - **Typed metadata**: system metadata (`cdmi_size`, `cdmi_ctime`, `cdmi_atime`, ...) is
//!   derived by the store and persisted as string-valued JSON next to user entries.
//! - **Staged publishing**: both files are written to unique staging files, synced, and
//!   published without clobbering, so a lost creation race reports a conflict.
//! - **Self-Healing**: staging files abandoned by interrupted creates are removed on startup.
//! - **Capability negotiation**: only path-addressed operations are implemented; the rest
//!   report [`StoreError::Unsupported`] and are absent from [`ObjectStore::capabilities`].
//!
//! # Examples
//!
//! ```rust
//! use cdmi_storage::{DataObjectDraft, ObjectStore, StoreError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StoreError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let base = tmp.path().join("cdmi");
//!     let store = ObjectStore::builder().base_directory(&base).connect().await?;
//!     # std::fs::create_dir(base.join("reports")).unwrap();
//!
//!     let object = store
//!         .create_non_cdmi_by_path(
//!             "reports/q3.csv",
//!             "text/csv",
//!             DataObjectDraft::new("a,b\n1,2\n").metadata("owner", "finance"),
//!         )
//!         .await?;
//!
//!     assert_eq!(object.mimetype(), "text/csv");
//!     assert_eq!(object.metadata().get("owner").as_deref(), Some("finance"));
//!     Ok(())
//! }
//! ```

mod builder;
mod codec;
mod container;
mod error;
mod ids;
mod maintenance;
mod object;
mod path;
mod publish;
mod security;
mod store;

pub use builder::{NoBase, ObjectStoreBuilder, WithBase};
pub use cdmi_domain::operations::{Operation, OperationSet};
pub use container::{ContainerLookup, DirectoryContainers};
pub use error::{StoreError, StoreErrorExt};
pub use ids::{NanoIdGenerator, ObjectIdGenerator};
pub use object::{AccessTime, DataObject, DataObjectDraft, Metadata};
pub use path::{ObjectLocation, ObjectPath};
pub use security::PathPolicy;
pub use store::{ObjectStore, StoreInner};
