use std::fmt::Debug;
use std::path::Path;

/// Answers whether a container directory exists.
///
/// Containers are created and validated elsewhere; the object store only asks.
/// Lookups may block: the store runs them on the blocking thread pool.
pub trait ContainerLookup: Debug + Send + Sync {
    fn exists(&self, container_dir: &Path) -> bool;
}

/// Treats any existing directory as a container.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryContainers;

impl ContainerLookup for DirectoryContainers {
    fn exists(&self, container_dir: &Path) -> bool {
        container_dir.is_dir()
    }
}
