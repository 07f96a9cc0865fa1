//! Shared primitive IDs, constants, and selection windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned customer identifier. Never reused after deletion.
pub type CustomerId = i64;

/// Calendar format accepted for every date field and query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest page a single list call may return.
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Offset used when the caller does not supply one.
pub const DEFAULT_PAGE_SKIP: i64 = 0;

/// Validated pagination window over insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of records to skip.
    pub skip: u64,
    /// Maximum number of records to return, in `1..=MAX_PAGE_LIMIT`.
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: DEFAULT_PAGE_SKIP as u64,
            limit: DEFAULT_PAGE_LIMIT as u64,
        }
    }
}

/// Validated inclusive date window with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date included.
    pub start: NaiveDate,
    /// Last date included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns true when `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The two mutually exclusive ways of selecting a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Offset/limit window in ascending id order.
    Page(Page),
    /// Every record born inside the window.
    Range(DateRange),
}
