//! Runtime event stream payloads.

use crate::types::CustomerId;

/// Events emitted after a write commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerEvent {
    /// A customer was inserted.
    Created {
        /// Assigned id.
        id: CustomerId,
    },
    /// An existing customer was updated.
    Updated {
        /// Updated id.
        id: CustomerId,
    },
    /// A customer was removed.
    Deleted {
        /// Removed id.
        id: CustomerId,
    },
}
