//! Record store abstraction with in-memory and SQLite backends.

pub mod memory;
pub mod sqlite;

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    customer::{Customer, CustomerDraft, CustomerPatch},
    types::CustomerId,
};

/// Failure raised by a [`RecordStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error reported by SQLite.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Storage-level unique constraint rejected the write.
    #[error("unique constraint on {field} violated by {value:?}")]
    UniqueViolation {
        /// Constrained column.
        field: &'static str,
        /// Rejected value.
        value: String,
    },
    /// A write targeted an id that is not present.
    #[error("no row with id {0}")]
    MissingRow(CustomerId),
    /// Backend could not be reached.
    #[error("{0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence collaborator holding customer rows.
///
/// Each method is one single-row (or read-only) operation; implementations
/// guarantee per-call atomicity and nothing more.
pub trait RecordStore: Send {
    /// Inserts a row and returns its freshly assigned id.
    fn insert(&mut self, draft: &CustomerDraft) -> StoreResult<CustomerId>;
    /// Fetches a row by id.
    fn get_by_id(&self, id: CustomerId) -> StoreResult<Option<Customer>>;
    /// Fetches the row holding exactly `email`.
    fn get_by_email(&self, email: &str) -> StoreResult<Option<Customer>>;
    /// Returns up to `limit` rows after skipping `offset`, in ascending id order.
    fn list(&self, offset: u64, limit: u64) -> StoreResult<Vec<Customer>>;
    /// Returns every row whose date of birth lies in `[start, end]`.
    fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<Customer>>;
    /// Overwrites the fields present in `patch`. The id must exist.
    fn update(&mut self, id: CustomerId, patch: &CustomerPatch) -> StoreResult<()>;
    /// Removes the row. The id must exist.
    fn delete(&mut self, id: CustomerId) -> StoreResult<()>;
}
