//! Argument domain model.
//!
//! # Responsibility
//! - Define the logged-disagreement record and its ordinal/status enums.
//! - Provide shallow-merge patch semantics for partial updates.
//!
//! # Invariants
//! - `category` is a soft reference to `Category::id`.
//! - `status` moves `ongoing -> resolved`; the reverse is an explicit reopen
//!   handled by the store, never by a plain patch.

use crate::model::{require_text, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque argument identifier.
pub type ArgumentId = String;

/// Ordinal severity, persisted as `1 | 2 | 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Minor = 1,
    Moderate = 2,
    Severe = 3,
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Minor),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Severe),
            other => Err(format!("invalid severity `{other}`; expected 1|2|3")),
        }
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value as u8
    }
}

/// Resolution state of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStatus {
    Ongoing,
    Resolved,
}

impl ArgumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Resolved => "resolved",
        }
    }
}

impl Display for ArgumentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged disagreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub id: ArgumentId,
    #[serde(with = "crate::model::timestamp")]
    pub date: DateTime<Utc>,
    /// Soft reference to `Category::id`.
    pub category: String,
    pub severity: Severity,
    pub status: ArgumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

impl Argument {
    /// Creates an ongoing argument with a generated id.
    pub fn new(date: DateTime<Utc>, category: impl Into<String>, severity: Severity) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), date, category, severity)
    }

    /// Creates an ongoing argument with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: impl Into<ArgumentId>,
        date: DateTime<Utc>,
        category: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            category: category.into(),
            severity,
            status: ArgumentStatus::Ongoing,
            resolution: None,
            reflection: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ArgumentStatus::Resolved
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("argument", "id", &self.id)?;
        require_text("argument", "category", &self.category)?;
        Ok(())
    }

    /// Applies `patch` over this argument; omitted fields are kept.
    pub fn apply(&mut self, patch: &ArgumentPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(resolution) = &patch.resolution {
            self.resolution = resolution.clone();
        }
        if let Some(reflection) = &patch.reflection {
            self.reflection = reflection.clone();
        }
    }
}

/// Partial update for an [`Argument`].
///
/// `None` keeps the current value. For the optional text fields,
/// `Some(None)` clears the value and `Some(Some(text))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentPatch {
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<ArgumentStatus>,
    pub resolution: Option<Option<String>>,
    pub reflection: Option<Option<String>>,
}

impl ArgumentPatch {
    pub fn status(status: ArgumentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn reflection(text: impl Into<String>) -> Self {
        Self {
            reflection: Some(Some(text.into())),
            ..Self::default()
        }
    }

    /// Checks only the fields this patch sets.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(category) = &self.category {
            require_text("argument", "category", category)?;
        }
        Ok(())
    }
}
