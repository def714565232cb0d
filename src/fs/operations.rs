use std::path::{Path, PathBuf};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{self, AsyncReadExt, AsyncWriteExt},
};

/// Reads a whole file under a shared lock. Returns `None` if the file doesn't exist.
pub async fn read_locked(path: &Path) -> Result<Option<String>, io::Error> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    file.lock_shared()?;
    let mut contents = String::new();
    let result = file.read_to_string(&mut contents).await;
    file.unlock_async().await?;
    result?;
    Ok(Some(contents))
}

/// Replaces the contents of `path` with `contents`.
/// The data is written into a sibling file first and then renamed over the target, so readers
/// either see the old value or the new one, never a mix of both.
pub async fn replace_contents(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let staging = staging_path(path);
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&staging)
        .await?;

    // Two writers racing on the same key would otherwise interleave inside the staging file.
    file.lock_exclusive()?;
    let result = write_all_synced(&mut file, contents).await;
    let result = match result {
        Ok(()) => tokio::fs::rename(&staging, path).await,
        Err(e) => Err(e),
    };
    file.unlock_async().await?;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&staging).await;
    }
    result
}

/// Removes a file, treating a missing file as already removed.
pub async fn remove_if_exists(path: &Path) -> Result<(), io::Error> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

async fn write_all_synced(file: &mut File, contents: &[u8]) -> Result<(), io::Error> {
    file.set_len(0).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_data().await
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|v| v.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{read_locked, remove_if_exists, replace_contents, staging_path};

    #[tokio::test]
    async fn test_replace_then_read() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("habits");

        replace_contents(&path, b"first value that is long").await?;
        replace_contents(&path, b"second").await?;

        assert_eq!(read_locked(&path).await?.as_deref(), Some("second"));
        assert!(!staging_path(&path).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing_file() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(read_locked(&dir.path().join("nothing")).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("theme");
        replace_contents(&path, b"dark").await?;

        remove_if_exists(&path).await?;
        remove_if_exists(&path).await?;

        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let path = std::path::Path::new("/tmp/store/dailyProgress");
        assert_eq!(
            staging_path(path),
            std::path::Path::new("/tmp/store/dailyProgress.tmp")
        );
    }
}
