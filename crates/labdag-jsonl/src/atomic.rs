//! Atomic JSONL file replacement.
//!
//! Records go to `<path>.tmp` (or `<stem>.<ext>.tmp`) first. Only after the
//! temp file is fully flushed is it renamed over the target, so the target
//! holds either the old contents or the complete new contents.

use crate::{JsonlWriter, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Atomically replaces `path` with one JSON line per element of `values`.
///
/// # Errors
///
/// Fails if the temp file cannot be created or written, a value fails to
/// serialize, or the rename fails. The target is untouched on failure and
/// the temp file is removed on a best-effort basis.
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_jsonl_atomic_iter(path, values.iter()).await
}

/// Iterator flavour of [`write_jsonl_atomic`].
///
/// # Errors
///
/// See [`write_jsonl_atomic`].
pub async fn write_jsonl_atomic_iter<T, I, P>(path: P, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    let written = match write_temp(&temp_path, values).await {
        Ok(count) => count,
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), records = written, "Wrote JSONL file atomically");
    Ok(())
}

/// `data.jsonl` -> `data.jsonl.tmp`, `data` -> `data.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let extension = match path.extension() {
        Some(ext) => {
            let mut ext = ext.to_os_string();
            ext.push(".tmp");
            ext
        }
        None => "tmp".into(),
    };
    path.with_extension(extension)
}

async fn write_temp<T, I>(temp_path: &Path, values: I) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(temp_path).await?;
    let mut writer = JsonlWriter::new(file);
    writer.write_all(values).await?;
    writer.flush().await?;
    let count = writer.records_written();
    writer.into_inner().into_inner().sync_all().await?;
    Ok(count)
}
