//! Session state containers for arguments and rewards.
//!
//! # Responsibility
//! - Own the in-memory collections for one application session.
//! - Rewrite whole collections to storage after every mutation.
//! - Report not-found, validation, storage and corrupt-state failures as
//!   distinct, non-panicking errors.
//!
//! # Invariants
//! - In-memory state changes only after every storage write of the mutation
//!   succeeded.
//! - Each store owns its two storage keys exclusively.

pub mod argument_store;
pub mod reward_store;

use crate::model::argument::ArgumentStatus;
use crate::model::ValidationError;
use crate::storage::{self, KeyValueStorage, StorageError, StorageKey};
use log::{error, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Entity family named in a not-found error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Argument,
    Category,
    Reward,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Argument => "argument",
            Self::Category => "category",
            Self::Reward => "reward",
        })
    }
}

/// Error returned by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// No record with `id` exists; nothing was changed.
    NotFound { entity: EntityKind, id: String },
    /// Record failed write-path validation.
    Validation(ValidationError),
    /// Backend write/read failure (quota, unavailable, SQLite).
    Storage(StorageError),
    /// Persisted collection under `key` cannot be decoded.
    CorruptState { key: String, message: String },
    /// Status change not permitted through a plain update.
    InvalidTransition {
        id: String,
        from: ArgumentStatus,
        to: ArgumentStatus,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(entity: EntityKind, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::CorruptState { key, message } => {
                write!(f, "corrupt state under `{key}`: {message}")
            }
            Self::InvalidTransition { id, from, to } => write!(
                f,
                "argument {id} cannot move from {from} to {to} through an update; reopen it instead"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Corrupt { key, message } => Self::CorruptState { key, message },
            other => Self::Storage(other),
        }
    }
}

/// Persists one mutation: the changed collection first, then its sibling.
///
/// When the sibling write fails the changed key is rewritten with its
/// `previous` contents so storage never keeps a mutation the caller was told
/// failed.
pub(crate) fn persist_pair<S, A, B>(
    storage: &S,
    changed: (StorageKey, &[A]),
    previous: &[A],
    sibling: (StorageKey, &[B]),
) -> StoreResult<()>
where
    S: KeyValueStorage + ?Sized,
    A: Serialize,
    B: Serialize,
{
    let (changed_key, changed_items) = changed;
    let (sibling_key, sibling_items) = sibling;

    storage::save(storage, changed_key, changed_items)?;
    if let Err(err) = storage::save(storage, sibling_key, sibling_items) {
        warn!(
            "event=store_persist module=store status=rollback key={changed_key} sibling={sibling_key}"
        );
        if let Err(restore_err) = storage::save(storage, changed_key, previous) {
            error!(
                "event=store_persist module=store status=error key={changed_key} error_code=rollback_failed error={restore_err}"
            );
        }
        return Err(err.into());
    }
    Ok(())
}
