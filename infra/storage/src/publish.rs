//! Staged publishing of an object's two backing files.
//!
//! 1. Content and metadata are written to unique staging files beside their targets and
//!    synced to disk.
//! 2. The content is published first, without clobbering: a hard link fails if the target
//!    already exists, which turns a lost creation race into a [`StoreError::Conflict`].
//! 3. The metadata is renamed into place. If that fails the freshly published content is
//!    removed again, so readers never see metadata without content.
//!
//! Readers look for the metadata file first, so between steps 2 and 3 the object is simply
//! not found yet.

use crate::error::{StoreError, StoreErrorExt};
use crate::path::ObjectLocation;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Infix marking staging files; the maintenance sweep looks for it.
pub(crate) const STAGING_MARKER: &str = ".cdmitmp.";

/// Longest object-name prefix kept in a staging name, in bytes. Keeps staging names well
/// below the usual 255-byte file name limit for any legal object name.
const STAGING_STEM_MAX: usize = 64;

pub(crate) async fn publish(
    location: &ObjectLocation,
    content: &[u8],
    metadata: &[u8],
    counter: &AtomicU64,
) -> Result<(), StoreError> {
    let content_stage = stage(&location.content_file, content, counter).await?;
    let metadata_stage = match stage(&location.metadata_file, metadata, counter).await {
        Ok(path) => path,
        Err(err) => {
            discard(&content_stage).await;
            return Err(err);
        },
    };

    if let Err(err) = link_no_clobber(&content_stage, &location.content_file).await {
        discard(&content_stage).await;
        discard(&metadata_stage).await;
        return Err(err);
    }
    discard(&content_stage).await;

    if let Err(err) = fs::rename(&metadata_stage, &location.metadata_file).await {
        discard(&metadata_stage).await;
        discard(&location.content_file).await;
        return Err(StoreError::Io {
            source: err,
            context: Some(
                format!("Metadata publish failed: {}", location.metadata_file.display()).into(),
            ),
        });
    }

    sync_dir(&location.container_dir).await;

    debug!(
        content = %location.content_file.display(),
        metadata = %location.metadata_file.display(),
        "Object files published"
    );
    Ok(())
}

async fn stage(target: &Path, data: &[u8], counter: &AtomicU64) -> Result<PathBuf, StoreError> {
    let staged = staging_path(target, counter);

    let written: Result<(), StoreError> = async {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&staged)
            .await
            .context(format!("Staging file creation failed: {}", staged.display()))?;
        file.write_all(data).await.context("Write failed")?;
        file.sync_all().await.context("Hardware sync failed")
    }
    .await;

    match written {
        Ok(()) => Ok(staged),
        Err(err) => {
            discard(&staged).await;
            Err(err)
        },
    }
}

async fn link_no_clobber(staged: &Path, target: &Path) -> Result<(), StoreError> {
    match fs::hard_link(staged, target).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(object_exists(target)),
        Err(err) => {
            warn!(
                target = %target.display(),
                error = %err,
                "Hard link unavailable, publishing content by rename"
            );
            if fs::try_exists(target).await.unwrap_or(false) {
                return Err(object_exists(target));
            }
            fs::rename(staged, target).await.context(format!(
                "Content publish failed: {} -> {}",
                staged.display(),
                target.display()
            ))
        },
    }
}

fn object_exists(target: &Path) -> StoreError {
    StoreError::conflict(format!("Object file <{}> exists", target.display()))
}

/// Best-effort removal; a missing file is not an error.
async fn discard(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {},
        Err(err) if err.kind() == ErrorKind::NotFound => {},
        Err(err) => warn!(path = %path.display(), error = %err, "Failed to remove file"),
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        // Directories cannot be opened on every platform.
        Err(err) => debug!(path = %path.display(), error = %err, "Directory open failed"),
    }
}

fn staging_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let n = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("object");
    let stem = truncate_at_char_boundary(file_name, STAGING_STEM_MAX);
    target.with_file_name(format!("{stem}{STAGING_MARKER}{}.{n}", std::process::id()))
}

fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
