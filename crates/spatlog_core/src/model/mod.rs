//! Domain model for argument and reward tracking.
//!
//! # Responsibility
//! - Define the records persisted by both stores and their JSON shapes.
//! - Provide shallow-merge patch types for partial updates.
//! - Validate records on write paths.
//!
//! # Invariants
//! - Identifiers are opaque, caller-visible strings; uniqueness is assumed,
//!   never enforced.
//! - Cross-record references (argument -> category, record -> reward) are
//!   soft: they are plain ids and may dangle.
//! - Decoding persisted data never runs validation; it only checks shape.

pub mod argument;
pub mod category;
pub mod reward;
pub mod timestamp;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Write-path validation failure for a domain record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity}.{field} must not be empty")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}
