//! Logical object paths and their on-disk locations.

use crate::error::StoreError;
use cdmi_domain::constants::METADATA_FILE_PREFIX;
use std::fmt;
use std::path::{Path, PathBuf};

const SEPARATOR: char = '/';

/// A logical object path split into its container part and object name.
///
/// `docs/guides/readme.txt` becomes container `docs/guides/` and name `readme.txt`.
/// Trailing separators are ignored, so `docs/readme.txt/` names the same object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath {
    container: String,
    name: String,
}

impl ObjectPath {
    /// Splits `path` on `/`.
    ///
    /// No segment-level validation happens here: `..` and empty segments are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedRequest`] when the path has no segments at all
    /// (empty, or separators only).
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        let trimmed = path.trim_end_matches(SEPARATOR);
        if trimmed.is_empty() {
            return Err(StoreError::MalformedRequest {
                message: format!("No object name in path <{path}>").into(),
                context: None,
            });
        }

        let (container, name) = match trimmed.rsplit_once(SEPARATOR) {
            Some((parent, name)) => (format!("{parent}{SEPARATOR}"), name),
            None => (String::new(), trimmed),
        };

        Ok(Self { container, name: name.to_owned() })
    }

    /// Container part including its trailing separator; empty for objects at the root.
    #[must_use]
    pub fn container_path(&self) -> &str {
        &self.container
    }

    #[must_use]
    pub fn object_name(&self) -> &str {
        &self.name
    }

    /// Name of the sidecar file: the object name with a leading dot.
    #[must_use]
    pub fn metadata_file_name(&self) -> String {
        format!("{METADATA_FILE_PREFIX}{}", self.name)
    }

    /// Every segment of the path, object name last.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.container_segments().chain(std::iter::once(self.name.as_str()))
    }

    fn container_segments(&self) -> impl Iterator<Item = &str> {
        self.container.strip_suffix(SEPARATOR).into_iter().flat_map(|c| c.split(SEPARATOR))
    }

    /// Places the object under `base`.
    ///
    /// Segments are appended one by one and empty ones skipped, so a leading `/` in the
    /// logical path never replaces `base` the way [`Path::join`] would.
    #[must_use]
    pub fn locate(&self, base: &Path) -> ObjectLocation {
        let mut container_dir = base.to_path_buf();
        for segment in self.container_segments().filter(|s| !s.is_empty()) {
            container_dir.push(segment);
        }

        ObjectLocation {
            content_file: container_dir.join(&self.name),
            metadata_file: container_dir.join(self.metadata_file_name()),
            container_dir,
        }
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.container, self.name)
    }
}

/// Absolute filesystem locations backing one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub container_dir: PathBuf,
    pub content_file: PathBuf,
    pub metadata_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_container_and_name() {
        let path = ObjectPath::parse("docs/guides/readme.txt").unwrap();
        assert_eq!(path.container_path(), "docs/guides/");
        assert_eq!(path.object_name(), "readme.txt");
        assert_eq!(path.metadata_file_name(), ".readme.txt");
    }

    #[test]
    fn root_object_has_empty_container() {
        let path = ObjectPath::parse("readme.txt").unwrap();
        assert_eq!(path.container_path(), "");
        assert_eq!(path.to_string(), "readme.txt");
    }

    #[test]
    fn trailing_separators_are_dropped() {
        let path = ObjectPath::parse("docs/readme.txt//").unwrap();
        assert_eq!(path.container_path(), "docs/");
        assert_eq!(path.object_name(), "readme.txt");
    }

    #[test]
    fn empty_segments_are_kept_in_the_container_path() {
        let path = ObjectPath::parse("/docs//readme.txt").unwrap();
        assert_eq!(path.container_path(), "/docs//");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["", "docs", "", "readme.txt"]);
    }

    #[test]
    fn rejects_paths_without_segments() {
        for raw in ["", "/", "///"] {
            assert!(
                matches!(ObjectPath::parse(raw), Err(StoreError::MalformedRequest { .. })),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn traversal_segments_pass_through() {
        let path = ObjectPath::parse("../outside/file").unwrap();
        assert_eq!(path.container_path(), "../outside/");
    }

    #[test]
    fn locate_stays_under_base_for_leading_separator() {
        let base = Path::new("/srv/cdmi");
        let location = ObjectPath::parse("/docs/readme.txt").unwrap().locate(base);
        assert_eq!(location.container_dir, PathBuf::from("/srv/cdmi/docs"));
        assert_eq!(location.content_file, PathBuf::from("/srv/cdmi/docs/readme.txt"));
        assert_eq!(location.metadata_file, PathBuf::from("/srv/cdmi/docs/.readme.txt"));
    }

    #[test]
    fn locate_root_object() {
        let base = Path::new("/srv/cdmi");
        let location = ObjectPath::parse("hello").unwrap().locate(base);
        assert_eq!(location.container_dir, base);
        assert_eq!(location.metadata_file, PathBuf::from("/srv/cdmi/.hello"));
    }
}
