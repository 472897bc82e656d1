//! Key-value persistence boundary and whole-collection adapter.
//!
//! # Responsibility
//! - Define the synchronous key-value contract the stores persist through.
//! - Encode/decode whole collections as JSON text under named keys.
//! - Classify failures: quota, unavailable backend, SQLite, corrupt payload.
//!
//! # Invariants
//! - `save` writes the full collection in one `set_item`; no partial writes.
//! - `load` returns `Ok(None)` only when the key was never written.
//! - Undecodable text is reported as `StorageError::Corrupt`, never masked.

pub mod memory;
pub mod sqlite;

use crate::db::DbError;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by a storage backend or by collection decoding.
#[derive(Debug)]
pub enum StorageError {
    /// Writing `key` would exceed the backend quota.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Backend cannot be used at all (disabled, closed, missing).
    Unavailable(String),
    /// SQLite backend failure.
    Db(DbError),
    /// Stored text under `key` does not decode to the expected collection.
    Corrupt { key: String, message: String },
}

impl StorageError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: need {required_bytes} bytes, quota {quota_bytes}"
            ),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Corrupt { key, message } => {
                write!(f, "corrupt stored collection `{key}`: {message}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string key-value storage, shaped after browser local storage.
///
/// Methods take `&self`; implementations use interior mutability so several
/// stores can share one backend through `Rc`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Rc<T> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }
}

/// The four persisted collection keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Arguments,
    Categories,
    Rewards,
    RewardRecords,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arguments => "arguments",
            Self::Categories => "categories",
            Self::Rewards => "rewards",
            Self::RewardRecords => "rewardRecords",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loads the collection stored under `key`.
///
/// Returns `Ok(None)` when the key was never written; callers supply defaults.
pub fn load<T, S>(storage: &S, key: StorageKey) -> StorageResult<Option<Vec<T>>>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    let Some(text) = storage.get_item(key.as_str())? else {
        debug!("event=storage_load module=storage status=absent key={key}");
        return Ok(None);
    };

    match serde_json::from_str::<Vec<T>>(&text) {
        Ok(items) => {
            debug!(
                "event=storage_load module=storage status=ok key={key} items={} bytes={}",
                items.len(),
                text.len()
            );
            Ok(Some(items))
        }
        Err(err) => {
            error!(
                "event=storage_load module=storage status=error key={key} error_code=corrupt_state line={} column={}",
                err.line(),
                err.column()
            );
            Err(StorageError::Corrupt {
                key: key.as_str().to_string(),
                message: err.to_string(),
            })
        }
    }
}

/// Encodes `items` and writes them under `key`, replacing any previous text.
pub fn save<T, S>(storage: &S, key: StorageKey, items: &[T]) -> StorageResult<()>
where
    T: Serialize,
    S: KeyValueStorage + ?Sized,
{
    let text = encode(key, items)?;
    write_encoded(storage, key, &text)?;
    debug!(
        "event=storage_save module=storage status=ok key={key} items={} bytes={}",
        items.len(),
        text.len()
    );
    Ok(())
}

pub(crate) fn encode<T: Serialize>(key: StorageKey, items: &[T]) -> StorageResult<String> {
    serde_json::to_string(items).map_err(|err| StorageError::Corrupt {
        key: key.as_str().to_string(),
        message: format!("cannot encode collection: {err}"),
    })
}

pub(crate) fn write_encoded<S>(storage: &S, key: StorageKey, text: &str) -> StorageResult<()>
where
    S: KeyValueStorage + ?Sized,
{
    storage.set_item(key.as_str(), text).map_err(|err| {
        error!("event=storage_save module=storage status=error key={key} error={err}");
        err
    })
}
