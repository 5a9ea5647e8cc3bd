use crate::error::StoreError;
use crate::storage::KeyValueStorage;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Directory-backed storage: one file per key.
///
/// Each `<dir>/<key>` file holds the item's value as UTF-8. Writes go to a
/// uniquely named `.tmp*` file in the same directory which is then renamed
/// over the item, so readers see the old or the new value and an
/// interrupted write leaves nothing that blocks the next one.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become file names, so anything that could escape the directory
    /// or collide with a lock file is rejected.
    fn validate_key(key: &str) -> Result<(), StoreError> {
        let reason = if key.is_empty() {
            "key cannot be empty"
        } else if key.contains('\0') {
            "key cannot contain null bytes"
        } else if key.contains('/') || key.contains('\\') {
            "key cannot contain path separators"
        } else if key.starts_with('.') {
            "key cannot start with '.'"
        } else {
            return Ok(());
        };
        Err(StoreError::InvalidKey(key.replace('\0', "\\0"), reason.into()))
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        Self::validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.item_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.item_path(key)?;
        fs::create_dir_all(&self.dir)?;
        let mut staged = tempfile::NamedTempFile::new_in(&self.dir)?;
        staged.write_all(value.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.item_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
