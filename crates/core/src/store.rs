//! Sharded JSON document storage.
//!
//! Each collection keeps one JSON document per entity:
//!
//! ```text
//! <collection_dir>/
//!   <s1>/
//!     <s2>/
//!       <uuid>/
//!         <document>.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the entity's canonical UUID.
//! Writes go to a temporary sibling file first and are then renamed into place, so a reader
//! never sees a half-written document.

use crate::error::{CoreError, CoreResult};
use crate::ShardableUuid;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A directory of JSON documents of one type.
#[derive(Debug)]
pub(crate) struct JsonCollection<T> {
    dir: PathBuf,
    file_name: &'static str,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(dir: PathBuf, file_name: &'static str) -> Self {
        Self {
            dir,
            file_name,
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Serialises compound read-check-write sequences (uniqueness checks, read-modify-write).
    ///
    /// A poisoned lock is recovered: the guarded data is `()`, so there is no state to repair.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn document_path(&self, id: &ShardableUuid) -> PathBuf {
        id.sharded_dir(&self.dir).join(self.file_name)
    }

    /// Write (create or overwrite) the document for `id`.
    pub(crate) fn put(&self, id: &ShardableUuid, value: &T) -> CoreResult<()> {
        let entity_dir = id.sharded_dir(&self.dir);
        fs::create_dir_all(&entity_dir).map_err(CoreError::StorageDirCreation)?;

        let json = serde_json::to_string_pretty(value).map_err(CoreError::Serialization)?;
        let target = entity_dir.join(self.file_name);
        let tmp = entity_dir.join(format!("{}.tmp", self.file_name));
        fs::write(&tmp, json).map_err(CoreError::FileWrite)?;
        fs::rename(&tmp, &target).map_err(CoreError::FileWrite)?;

        Ok(())
    }

    /// Read the document for `id`, or `None` if it does not exist.
    pub(crate) fn get(&self, id: &ShardableUuid) -> CoreResult<Option<T>> {
        match fs::read_to_string(self.document_path(id)) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(CoreError::Deserialization),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::FileRead(e)),
        }
    }

    /// Remove the entity directory for `id`. Returns whether anything was removed.
    pub(crate) fn remove(&self, id: &ShardableUuid) -> CoreResult<bool> {
        match fs::remove_dir_all(id.sharded_dir(&self.dir)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::FileRemove(e)),
        }
    }

    /// Read every document in the collection.
    ///
    /// Missing collection directories yield an empty list. Documents that cannot be parsed
    /// are logged and skipped so one corrupt file does not take a listing down.
    pub(crate) fn list(&self) -> Vec<T> {
        let mut items = Vec::new();
        for path in self.document_paths() {
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::warn!("failed to read {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str(&contents) {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!("failed to parse {}: {}", path.display(), e),
            }
        }
        items
    }

    /// First document matching `predicate`.
    pub(crate) fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.list().into_iter().find(|item| predicate(item))
    }

    fn document_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for s1 in read_subdirs(&self.dir) {
            for s2 in read_subdirs(&s1) {
                for id_dir in read_subdirs(&s2) {
                    let doc = id_dir.join(self.file_name);
                    if doc.is_file() {
                        paths.push(doc);
                    }
                }
            }
        }
        paths
    }
}

fn read_subdirs(dir: &Path) -> Vec<PathBuf> {
    let iter = match fs::read_dir(dir) {
        Ok(it) => it,
        Err(_) => return Vec::new(),
    };
    iter.flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect()
}
