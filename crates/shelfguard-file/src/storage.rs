//! Filesystem storage for session state.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use shelfguard_core::Result;
use shelfguard_core::error::{Error, InvalidInputError, StorageError};
use shelfguard_core::traits::SessionStorage;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Name of the lock file serializing writers across processes.
const LOCK_FILE: &str = ".lock";

fn map_io(key: &str, err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        key: key.to_string(),
        message: err.to_string(),
    })
}

/// Filesystem-backed [`SessionStorage`].
///
/// Each key lives in `<root>/<key>.json`. Writes go to a temporary file that
/// is synced and renamed over the target under an exclusive lock, so readers
/// see either the old value or the new one. On Unix the directory is `0700`
/// and value files are `0600`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`. The directory is created lazily.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the file path for a key.
    fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Keys become file names, so only a conservative alphabet is allowed.
    fn check_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else {
            Err(InvalidInputError::Other {
                message: format!("storage key '{}' must be alphanumeric, '-' or '_'", key),
            }
            .into())
        }
    }

    fn ensure_root(&self, key: &str) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| map_io(key, e))?;

        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&self.root)
                .map_err(|e| map_io(key, e))?
                .permissions();
            perms.set_mode(0o700);
            fs::set_permissions(&self.root, perms).map_err(|e| map_io(key, e))?;
        }

        Ok(())
    }

    /// Open and exclusively lock the lock file.
    fn lock(&self, key: &str) -> Result<File> {
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.root.join(LOCK_FILE))
            .map_err(|e| map_io(key, e))?;

        lock_file.lock_exclusive().map_err(|e| map_io(key, e))?;
        Ok(lock_file)
    }
}

impl SessionStorage for FileStorage {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn read(&self, key: &str) -> Result<Option<String>> {
        Self::check_key(key)?;

        match fs::read_to_string(self.value_path(key)) {
            Ok(contents) => {
                trace!("Read stored value");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io(key, e)),
        }
    }

    #[instrument(skip(self, value), fields(root = %self.root.display()))]
    fn write(&self, key: &str, value: &str) -> Result<()> {
        Self::check_key(key)?;
        self.ensure_root(key)?;
        let lock_file = self.lock(key)?;

        let path = self.value_path(key);
        let temp_path = self
            .root
            .join(format!("{}.json.{}.tmp", key, Uuid::new_v4().simple()));

        let result = (|| {
            let mut file = File::create(&temp_path)?;

            #[cfg(unix)]
            {
                let mut perms = file.metadata()?.permissions();
                perms.set_mode(0o600);
                file.set_permissions(perms)?;
            }

            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &path)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result.map_err(|e| map_io(key, e))?;

        lock_file.unlock().map_err(|e| map_io(key, e))?;
        debug!("Stored value written");
        Ok(())
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn remove(&self, key: &str) -> Result<()> {
        Self::check_key(key)?;
        if !self.root.exists() {
            return Ok(());
        }
        let lock_file = self.lock(key)?;

        match fs::remove_file(self.value_path(key)) {
            Ok(()) => debug!("Stored value removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(map_io(key, e)),
        }

        lock_file.unlock().map_err(|e| map_io(key, e))?;
        Ok(())
    }
}
