//! Customer record, raw payloads, validated drafts, and patches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::CustomerId;

/// Fully materialized customer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-assigned identifier.
    pub id: CustomerId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address, unique across live records.
    pub email: String,
    /// Calendar date of birth.
    pub date_of_birth: NaiveDate,
}

/// Create payload as decoded from the transport.
///
/// Every slot is optional so missing fields are reported by validation
/// together, instead of failing on the first one during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCustomer {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact address.
    pub email: Option<String>,
    /// Date of birth as `YYYY-MM-DD` text.
    pub date_of_birth: Option<String>,
}

/// Update payload as decoded from the transport. `None` means "not supplied".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerChanges {
    /// Replacement given name.
    pub first_name: Option<String>,
    /// Replacement family name.
    pub last_name: Option<String>,
    /// Replacement contact address.
    pub email: Option<String>,
    /// Replacement date of birth as `YYYY-MM-DD` text.
    pub date_of_birth: Option<String>,
}

/// Validated insert payload used to create a new [`Customer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    pub email: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
}

impl CustomerDraft {
    /// Materializes the draft under a store-assigned id.
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            date_of_birth: self.date_of_birth,
        }
    }
}

/// Sparse patch where each `Some` field overwrites the record value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerPatch {
    /// Optional replacement for the given name.
    pub first_name: Option<String>,
    /// Optional replacement for the family name.
    pub last_name: Option<String>,
    /// Optional replacement for the contact address.
    pub email: Option<String>,
    /// Optional replacement for the date of birth.
    pub date_of_birth: Option<NaiveDate>,
}

impl CustomerPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns the new email when this patch moves `current` to a different address.
    pub fn changes_email(&self, current: &Customer) -> Option<&str> {
        self.email
            .as_deref()
            .filter(|email| *email != current.email)
    }

    /// Applies this patch in place to `rec`.
    pub fn apply_to(&self, rec: &mut Customer) {
        if let Some(v) = &self.first_name {
            rec.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            rec.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            rec.email = v.clone();
        }
        if let Some(v) = self.date_of_birth {
            rec.date_of_birth = v;
        }
    }
}
