//! Session-scoped owner of storage and both stores.
//!
//! # Responsibility
//! - Construct each store exactly once per session and initialize it.
//! - Hand the view layer explicit store handles instead of globals.
//!
//! # Invariants
//! - Both stores share one storage backend and never touch each other's keys.

use crate::config::{CoreConfig, StorageLocation};
use crate::storage::{
    KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult,
};
use crate::store::argument_store::ArgumentStore;
use crate::store::reward_store::RewardStore;
use crate::store::StoreResult;
use log::info;
use std::rc::Rc;

/// Storage chosen at runtime from [`CoreConfig`].
pub enum ConfiguredStorage {
    Memory(MemoryStorage),
    Sqlite(SqliteStorage),
}

impl KeyValueStorage for ConfiguredStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match self {
            Self::Memory(storage) => storage.get_item(key),
            Self::Sqlite(storage) => storage.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        match self {
            Self::Memory(storage) => storage.set_item(key, value),
            Self::Sqlite(storage) => storage.set_item(key, value),
        }
    }
}

/// Application state for one session.
pub struct CoreContext<S: KeyValueStorage> {
    storage: Rc<S>,
    arguments: ArgumentStore<Rc<S>>,
    rewards: RewardStore<Rc<S>>,
}

impl<S: KeyValueStorage> CoreContext<S> {
    /// Builds and initializes both stores over `storage`.
    ///
    /// # Errors
    /// - Storage failures while seeding defaults.
    /// - `CorruptState` when a stored collection does not decode.
    pub fn new(storage: S) -> StoreResult<Self> {
        let storage = Rc::new(storage);
        let mut arguments = ArgumentStore::new(Rc::clone(&storage));
        let mut rewards = RewardStore::new(Rc::clone(&storage));
        arguments.initialize()?;
        rewards.initialize()?;

        info!("event=context_open module=context status=ok");
        Ok(Self {
            storage,
            arguments,
            rewards,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn arguments(&self) -> &ArgumentStore<Rc<S>> {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut ArgumentStore<Rc<S>> {
        &mut self.arguments
    }

    pub fn rewards(&self) -> &RewardStore<Rc<S>> {
        &self.rewards
    }

    pub fn rewards_mut(&mut self) -> &mut RewardStore<Rc<S>> {
        &mut self.rewards
    }
}

impl CoreContext<MemoryStorage> {
    /// Session over fresh, empty in-memory storage.
    pub fn in_memory() -> StoreResult<Self> {
        Self::new(MemoryStorage::new())
    }
}

impl CoreContext<ConfiguredStorage> {
    /// Opens the backend named by `config.storage`.
    pub fn open(config: &CoreConfig) -> StoreResult<Self> {
        let storage = match &config.storage {
            StorageLocation::Memory => ConfiguredStorage::Memory(MemoryStorage::new()),
            StorageLocation::Sqlite(path) => ConfiguredStorage::Sqlite(
                SqliteStorage::open(path).map_err(StorageError::from)?,
            ),
        };
        Self::new(storage)
    }
}
