//! Filesystem storage for persisted sessions.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument};
use uuid::Uuid;

use authkeep_core::Result;
use authkeep_core::error::{Error, InvalidInputError, StorageError};
use authkeep_core::traits::SessionStorage;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Name of the advisory lock file guarding writes.
const LOCK_FILE: &str = ".lock";

fn map_io(key: &str, err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        key: key.to_string(),
        message: err.to_string(),
    })
}

/// Session storage backed by a directory on disk.
///
/// Each key lives in `<dir>/<key>.json`. Writes go to a temporary file that
/// is renamed into place while an exclusive lock on `<dir>/.lock` is held, so
/// readers see either the old or the new value. On Unix the files are
/// created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Get the storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the file path for a key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn lock(&self, key: &str) -> Result<File> {
        fs::create_dir_all(&self.dir).map_err(|e| map_io(key, e))?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE))
            .map_err(|e| map_io(key, e))?;

        lock_file.lock_exclusive().map_err(|e| map_io(key, e))?;
        Ok(lock_file)
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        Some("must not be empty")
    } else if key.starts_with('.') {
        Some("must not start with '.'")
    } else if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        Some("may only contain ASCII letters, digits, '-', '_' and '.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(InvalidInputError::StorageKey {
            value: key.to_string(),
            reason: reason.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

fn create_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path)
}

impl SessionStorage for FileStorage {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io(key, e)),
        }
    }

    #[instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let lock_file = self.lock(key)?;

        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key, Uuid::new_v4().simple()));

        let written = create_private(&temp_path)
            .and_then(|mut file| {
                file.write_all(value.as_bytes())?;
                file.sync_data()
            })
            .and_then(|()| fs::rename(&temp_path, &path));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(map_io(key, e));
        }

        lock_file.unlock().map_err(|e| map_io(key, e))?;

        debug!(path = %path.display(), "Stored value");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let lock_file = self.lock(key)?;

        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed value"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(map_io(key, e)),
        }

        lock_file.unlock().map_err(|e| map_io(key, e))?;
        Ok(())
    }
}
