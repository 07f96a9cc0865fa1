//! Failure taxonomy returned by the mutation pipeline.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::{store::StoreError, types::CustomerId};

/// One offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the payload.
    pub field: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

impl FieldError {
    /// Builds a field error.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Classified failure of a pipeline operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or malformed required input.
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),
    /// Unique-field collision on create or update.
    #[error("a customer with this {field} already exists: {value}")]
    DuplicateKey {
        /// Name of the unique field.
        field: &'static str,
        /// Colliding value.
        value: String,
    },
    /// The target id does not exist.
    #[error("customer {0} not found")]
    NotFound(CustomerId),
    /// Update requested with no fields.
    #[error("update must supply at least one field")]
    EmptyUpdate,
    /// Skip or limit outside the allowed window.
    #[error("invalid pagination: skip={skip}, limit={limit}")]
    InvalidPagination {
        /// Requested offset as supplied.
        skip: String,
        /// Requested page size as supplied.
        limit: String,
    },
    /// Date text that does not parse as `YYYY-MM-DD`.
    #[error("invalid date for {field}: {value:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat {
        /// Parameter or field name.
        field: &'static str,
        /// Offending text.
        value: String,
    },
    /// Start date after end date.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start date.
        start: String,
        /// Requested end date.
        end: String,
    },
    /// The record store could not serve the request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(StoreError),
}

impl PipelineError {
    /// Stable snake_case name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failure",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::NotFound(_) => "not_found",
            Self::EmptyUpdate => "empty_update",
            Self::InvalidPagination { .. } => "invalid_pagination",
            Self::InvalidDateFormat { .. } => "invalid_date_format",
            Self::InvalidRange { .. } => "invalid_range",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Offending fields for a validation failure, empty otherwise.
    pub fn fields(&self) -> &[FieldError] {
        match self {
            Self::Validation(fields) => fields,
            _ => &[],
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UniqueViolation { field, value } => Self::DuplicateKey { field, value },
            StoreError::MissingRow(id) => Self::NotFound(id),
            other => Self::StoreUnavailable(other),
        }
    }
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
