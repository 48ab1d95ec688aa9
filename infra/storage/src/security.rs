use crate::error::StoreError;
use crate::path::ObjectPath;
use std::path::Path;

/// How object paths are vetted before they touch the filesystem.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum PathPolicy {
    /// Segments are used verbatim, `..` included.
    #[default]
    Lenient,
    /// `.`/`..` segments are rejected and container directories must resolve inside the
    /// base directory (symlinks included).
    Strict,
}

impl PathPolicy {
    pub(crate) fn check_segments(self, path: &ObjectPath) -> Result<(), StoreError> {
        if self == Self::Lenient {
            return Ok(());
        }

        match path.segments().find(|s| matches!(*s, "." | "..")) {
            Some(segment) => Err(StoreError::PathTraversalAttempt {
                message: path.to_string().into(),
                context: Some(format!("Relative segment '{segment}' is not allowed").into()),
            }),
            None => Ok(()),
        }
    }

    /// Verifies an existing container directory does not escape `base` through a symlink.
    pub(crate) async fn check_container(
        self,
        base: &Path,
        container_dir: &Path,
    ) -> Result<(), StoreError> {
        if self == Self::Lenient {
            return Ok(());
        }

        match tokio::fs::canonicalize(container_dir).await {
            Ok(canonical) if canonical.starts_with(base) => Ok(()),
            Ok(canonical) => Err(StoreError::PathTraversalAttempt {
                message: canonical.display().to_string().into(),
                context: Some("Container resolves outside the base directory".into()),
            }),
            Err(e) => Err(StoreError::Io {
                source: e,
                context: Some(format!("Failed to verify container {}", container_dir.display()).into()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_accepts_parent_segments() {
        let path = ObjectPath::parse("a/../b").unwrap();
        assert!(PathPolicy::Lenient.check_segments(&path).is_ok());
    }

    #[test]
    fn strict_rejects_relative_segments() {
        for raw in ["a/../b", "./b", "a/.."] {
            let path = ObjectPath::parse(raw).unwrap();
            assert!(
                matches!(
                    PathPolicy::Strict.check_segments(&path),
                    Err(StoreError::PathTraversalAttempt { .. })
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn strict_accepts_dotted_names() {
        let path = ObjectPath::parse("docs/.hidden/..name").unwrap();
        assert!(PathPolicy::Strict.check_segments(&path).is_ok());
    }
}
