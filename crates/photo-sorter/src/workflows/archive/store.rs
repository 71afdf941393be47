use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::fs;

/// Mode applied to directories created under the archive root.
pub const SHARED_DIR_MODE: u32 = 0o777;
/// Mode applied to copied files.
pub const SHARED_FILE_MODE: u32 = 0o666;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// Destination already existed and was left untouched.
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unable to list {}: {source}", path.display())]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to stat {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to set permissions on {}: {source}", path.display())]
    Permissions {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Filesystem operations the archive batch depends on.
pub trait FileStore: Send + Sync {
    /// File names directly inside `dir`, in the order the filesystem returns them.
    /// Names are kept as the OS reports them so non-UTF-8 names still resolve.
    fn list(&self, dir: &Path) -> impl Future<Output = Result<Vec<OsString>, StoreError>> + Send;

    /// Creates `dir` and any missing ancestors.
    fn ensure_dir(&self, dir: &Path) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Copies `from` to `to` unless `to` already exists.
    fn copy(
        &self,
        from: &Path,
        to: &Path,
    ) -> impl Future<Output = Result<CopyOutcome, StoreError>> + Send;
}

/// [`FileStore`] over the local filesystem, sharing everything it creates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    async fn list(&self, dir: &Path) -> Result<Vec<OsString>, StoreError> {
        let list_error = |source| StoreError::List {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir).await.map_err(list_error)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
            let file_type = entry.file_type().await.map_err(list_error)?;
            if file_type.is_dir() {
                continue;
            }
            names.push(entry.file_name());
        }

        Ok(names)
    }

    async fn ensure_dir(&self, dir: &Path) -> Result<(), StoreError> {
        let mut missing = Vec::new();
        let mut cursor = Some(dir);
        while let Some(path) = cursor {
            if path.as_os_str().is_empty() || exists(path).await? {
                break;
            }
            missing.push(path.to_path_buf());
            cursor = path.parent();
        }

        for path in missing.into_iter().rev() {
            match fs::create_dir(&path).await {
                Ok(()) => set_mode(&path, SHARED_DIR_MODE).await?,
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(source) => return Err(StoreError::CreateDir { path, source }),
            }
        }

        Ok(())
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<CopyOutcome, StoreError> {
        if exists(to).await? {
            return Ok(CopyOutcome::Skipped);
        }

        if let Some(parent) = to.parent() {
            self.ensure_dir(parent).await?;
        }

        fs::copy(from, to)
            .await
            .map_err(|source| StoreError::Copy {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            })?;
        set_mode(to, SHARED_FILE_MODE).await?;

        Ok(CopyOutcome::Copied)
    }
}

async fn exists(path: &Path) -> Result<bool, StoreError> {
    fs::try_exists(path)
        .await
        .map_err(|source| StoreError::Stat {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|source| StoreError::Permissions {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> Result<(), StoreError> {
    Ok(())
}
