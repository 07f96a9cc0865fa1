//! In-memory record store with insertion-order and email indices.

use chrono::NaiveDate;
use hashbrown::HashMap;

use crate::{
    customer::{Customer, CustomerDraft, CustomerPatch},
    types::{CustomerId, DateRange},
};

use super::{RecordStore, StoreError, StoreResult};

/// Hash-indexed store used for tests and the `memory` backend.
#[derive(Debug)]
pub struct MemoryStore {
    records: HashMap<CustomerId, Customer>,
    // Ascending, since ids are handed out monotonically.
    order: Vec<CustomerId>,
    by_email: HashMap<String, CustomerId>,
    next_id: CustomerId,
}

impl MemoryStore {
    /// Creates an empty store whose first id is 1.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            by_email: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no rows are live.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Live ids in ascending order.
    pub fn ordered_ids(&self) -> &[CustomerId] {
        &self.order
    }

    fn take_next_id(&mut self) -> CustomerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn email_owner(&self, email: &str) -> Option<CustomerId> {
        self.by_email.get(email).copied()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&mut self, draft: &CustomerDraft) -> StoreResult<CustomerId> {
        if self.email_owner(&draft.email).is_some() {
            return Err(StoreError::UniqueViolation {
                field: "email",
                value: draft.email.clone(),
            });
        }

        let id = self.take_next_id();
        let rec = draft.clone().into_customer(id);
        self.by_email.insert(rec.email.clone(), id);
        self.order.push(id);
        self.records.insert(id, rec);
        Ok(id)
    }

    fn get_by_id(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.records.get(&id).cloned())
    }

    fn get_by_email(&self, email: &str) -> StoreResult<Option<Customer>> {
        Ok(self
            .email_owner(email)
            .and_then(|id| self.records.get(&id))
            .cloned())
    }

    fn list(&self, offset: u64, limit: u64) -> StoreResult<Vec<Customer>> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .order
            .iter()
            .skip(start)
            .take(take)
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }

    fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<Customer>> {
        let window = DateRange { start, end };
        Ok(self
            .order
            .iter()
            .filter_map(|id| self.records.get(id))
            .filter(|rec| window.contains(rec.date_of_birth))
            .cloned()
            .collect())
    }

    fn update(&mut self, id: CustomerId, patch: &CustomerPatch) -> StoreResult<()> {
        if let Some(email) = &patch.email {
            if self.email_owner(email).is_some_and(|owner| owner != id) {
                return Err(StoreError::UniqueViolation {
                    field: "email",
                    value: email.clone(),
                });
            }
        }

        let rec = self.records.get_mut(&id).ok_or(StoreError::MissingRow(id))?;
        let old_email = rec.email.clone();
        patch.apply_to(rec);

        if rec.email != old_email {
            self.by_email.remove(&old_email);
            self.by_email.insert(rec.email.clone(), id);
        }
        Ok(())
    }

    fn delete(&mut self, id: CustomerId) -> StoreResult<()> {
        let rec = self.records.remove(&id).ok_or(StoreError::MissingRow(id))?;
        self.by_email.remove(&rec.email);
        if let Ok(pos) = self.order.binary_search(&id) {
            self.order.remove(pos);
        }
        Ok(())
    }
}
