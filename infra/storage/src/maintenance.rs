use crate::publish::STAGING_MARKER;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Staging files younger than this may belong to an in-flight create.
const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes staging files abandoned by crashed or interrupted creates.
pub(crate) async fn purge_staging(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now, STALE_AFTER)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up abandoned staging files");
        },
        Err(e) => {
            error!(error = %e, "Staging cleanup task panicked");
        },
        _ => {},
    }
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    for entry in WalkDir::new(root).into_iter().flatten() {
        if !(is_staging(&entry) && is_stale(&entry, now, threshold)) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to remove staging file");
                failed += 1;
            },
        }
    }

    (removed, failed)
}

/// Matches `<name>.cdmitmp.<pid>.<counter>`.
fn is_staging(entry: &DirEntry) -> bool {
    if !entry.file_type().is_file() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    let Some((_, suffix)) = name.rsplit_once(STAGING_MARKER) else {
        return false;
    };
    suffix
        .split_once('.')
        .is_some_and(|(pid, n)| is_number(pid) && is_number(n))
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .is_none_or(|modified| now.duration_since(modified).is_ok_and(|age| age > threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn removes_only_stale_staging_files() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("readme.txt.cdmitmp.42.7"), b"x").unwrap();
        fs::write(docs.join(".readme.txt.cdmitmp.42.8"), b"{}").unwrap();
        fs::write(docs.join("notes.cdmitmp.txt"), b"user object").unwrap();
        fs::write(docs.join("readme.txt"), b"hello").unwrap();

        let later = SystemTime::now() + Duration::from_secs(3600);
        let (removed, failed) = remove_stale(temp.path(), later, STALE_AFTER);

        assert_eq!((removed, failed), (2, 0));
        assert!(docs.join("readme.txt").exists());
        assert!(docs.join("notes.cdmitmp.txt").exists());
        assert!(docs.is_dir(), "empty containers are left alone");
    }

    #[test]
    fn keeps_fresh_staging_files() {
        let temp = TempDir::new().unwrap();
        let staged = temp.path().join("obj.cdmitmp.1.1");
        fs::write(&staged, b"x").unwrap();

        let (removed, _) = remove_stale(temp.path(), SystemTime::now(), STALE_AFTER);

        assert_eq!(removed, 0);
        assert!(staged.exists());
    }
}
