use cardset_core::{Storage, StorageError};
use chrono::{NaiveDateTime, Utc};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub mod paths;

pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Storage slots kept as `<root>/<slot>.json`, one file per slot.
///
/// Writes land in a temp file in the same directory and are renamed over the
/// slot file, so a crash never leaves a half-written slot. Each write also
/// drops a timestamped copy into the backups directory.
pub struct JsonFileStorage {
    root: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
}

impl JsonFileStorage {
    pub fn open_default() -> Result<Self, StorageError> {
        let root = paths::data_root();
        let backups = paths::backups_dir(&root);
        Self::open_with(root, backups, DEFAULT_MAX_BACKUPS)
    }

    pub fn open_in(root: impl Into<PathBuf>, max_backups: usize) -> Result<Self, StorageError> {
        let root = root.into();
        let backups = paths::backups_dir(&root);
        Self::open_with(root, backups, max_backups)
    }

    /// `max_backups == 0` turns backups off.
    pub fn open_with(
        root: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&root)?;
        if max_backups > 0 {
            fs::create_dir_all(&backups_dir)?;
        }
        debug!(root = %root.display(), max_backups, "opened file storage");
        Ok(Self {
            root,
            backups_dir,
            max_backups,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        check_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Backup files for `key`, oldest first.
    pub fn backups(&self, key: &str) -> Result<Vec<PathBuf>, StorageError> {
        check_key(key)?;
        list_backups(&self.backups_dir, key).map_err(StorageError::from)
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        write_atomic(&path, value.as_bytes())?;
        if self.max_backups > 0 {
            // The slot itself is already safe on disk; a failed backup is only worth a warning.
            if let Err(e) = write_backup(&self.backups_dir, key, value, self.max_backups) {
                warn!(key, error = %e, "could not write backup");
            }
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn check_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(StorageError::Unavailable(format!("invalid slot name {key:?}")))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

const BACKUP_STAMP: &str = "%Y%m%d-%H%M%S%.3f";

// Each slot gets its own directory under `dir`, so slot names sharing a
// prefix never see each other's backups.
fn write_backup(dir: &Path, key: &str, value: &str, keep: usize) -> Result<(), std::io::Error> {
    let slot_dir = dir.join(key);
    fs::create_dir_all(&slot_dir)?;
    let ts = Utc::now().format(BACKUP_STAMP);
    write_atomic(&slot_dir.join(format!("{ts}.json")), value.as_bytes())?;
    rotate_backups(dir, key, keep)
}

fn is_backup_name(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
        && path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|stem| NaiveDateTime::parse_from_str(stem, BACKUP_STAMP).is_ok())
            .unwrap_or(false)
}

fn list_backups(dir: &Path, key: &str) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut entries: Vec<PathBuf> = match fs::read_dir(dir.join(key)) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_backup_name(p))
            .collect(),
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e),
    };
    // UTC stamps sort chronologically by name.
    entries.sort();
    Ok(entries)
}

fn rotate_backups(dir: &Path, key: &str, keep: usize) -> Result<(), std::io::Error> {
    let entries = list_backups(dir, key)?;
    if entries.len() > keep {
        for p in &entries[..entries.len() - keep] {
            let _ = fs::remove_file(p);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slot_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let s = JsonFileStorage::open_in(dir.path(), 3).unwrap();
        assert_eq!(s.get("flashcards").unwrap(), None);
    }

    #[test]
    fn set_then_get_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let s = JsonFileStorage::open_in(dir.path(), 3).unwrap();
        s.set("flashcards", "[]").unwrap();
        assert_eq!(s.get("flashcards").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("flashcards.json").exists());
        s.remove("flashcards").unwrap();
        s.remove("flashcards").unwrap();
        assert_eq!(s.get("flashcards").unwrap(), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let s = JsonFileStorage::open_in(dir.path(), 0).unwrap();
        for key in ["../escape", "", ".hidden", "a/b"] {
            assert!(matches!(s.set(key, "x"), Err(StorageError::Unavailable(_))), "{key}");
        }
    }

    #[test]
    fn backups_rotate_per_slot() {
        let dir = tempfile::tempdir().unwrap();
        let s = JsonFileStorage::open_in(dir.path(), 2).unwrap();
        for i in 0..4 {
            s.set("flashcards", &format!("[{i}]")).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        s.set("other", "[]").unwrap();
        let backups = s.backups("flashcards").unwrap();
        assert_eq!(backups.len(), 2);
        let newest = fs::read_to_string(backups.last().unwrap()).unwrap();
        assert_eq!(newest, "[3]");
        assert_eq!(s.backups("other").unwrap().len(), 1);
    }

    #[test]
    fn slots_sharing_a_prefix_keep_separate_backups() {
        let dir = tempfile::tempdir().unwrap();
        let s = JsonFileStorage::open_in(dir.path(), 2).unwrap();
        s.set("x-a", "[\"a\"]").unwrap();
        for i in 0..3 {
            std::thread::sleep(std::time::Duration::from_millis(5));
            s.set("x", &format!("[{i}]")).unwrap();
        }
        let own = s.backups("x").unwrap();
        assert_eq!(own.len(), 2);
        let contents: Vec<_> = own.iter().map(|p| fs::read_to_string(p).unwrap()).collect();
        assert_eq!(contents, ["[1]", "[2]"]);

        let other = s.backups("x-a").unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(fs::read_to_string(&other[0]).unwrap(), "[\"a\"]");
    }

    #[test]
    fn stray_files_are_not_backups() {
        let dir = tempfile::tempdir().unwrap();
        let s = JsonFileStorage::open_in(dir.path(), 1).unwrap();
        s.set("x", "[]").unwrap();
        let slot_dir = s.backups_dir().join("x");
        fs::write(slot_dir.join("notes.json"), "{}").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        s.set("x", "[1]").unwrap();
        assert!(slot_dir.join("notes.json").exists());
        let backups = s.backups("x").unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "[1]");
    }

    #[test]
    fn zero_backups_writes_none() {
        let dir = tempfile::tempdir().unwrap();
        let s = JsonFileStorage::open_in(dir.path(), 0).unwrap();
        s.set("flashcards", "[]").unwrap();
        assert!(s.backups("flashcards").unwrap().is_empty());
    }
}
