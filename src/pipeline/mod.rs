//! Validated mutation pipeline between decoded requests and the record store.
//!
//! Every operation takes the store explicitly; the pipeline keeps no state of
//! its own between calls.

mod command;

pub use command::{Command, Outcome, execute};

use tracing::{debug, info, warn};

use crate::{
    customer::{Customer, CustomerChanges, NewCustomer},
    error::{PipelineError, PipelineResult},
    store::{RecordStore, StoreError},
    types::{CustomerId, Selection},
    validate::{self, ListQuery},
};

/// Validates `input`, rejects a reused email, and inserts the record.
pub fn create(store: &mut dyn RecordStore, input: NewCustomer) -> PipelineResult<Customer> {
    let draft = validate::validate_new(input).inspect_err(log_rejected)?;

    if store.get_by_email(&draft.email).map_err(store_failure)?.is_some() {
        debug!(email = %draft.email, "create rejected: email already registered");
        return Err(PipelineError::DuplicateKey {
            field: "email",
            value: draft.email,
        });
    }

    let id = store.insert(&draft).map_err(store_failure)?;
    info!(id, "customer created");
    Ok(draft.into_customer(id))
}

/// Fetches one record.
pub fn get(store: &dyn RecordStore, id: CustomerId) -> PipelineResult<Customer> {
    store
        .get_by_id(id)
        .map_err(store_failure)?
        .ok_or(PipelineError::NotFound(id))
}

/// Lists a page in id order, or every record born inside a date range.
pub fn list(store: &dyn RecordStore, query: &ListQuery) -> PipelineResult<Vec<Customer>> {
    let selection = validate::select(query).inspect_err(log_rejected)?;
    let rows = match selection {
        Selection::Page(page) => store.list(page.skip, page.limit),
        Selection::Range(range) => store.list_by_date_range(range.start, range.end),
    };
    rows.map_err(store_failure)
}

/// Applies the supplied fields to an existing record and returns the merged result.
pub fn update(
    store: &mut dyn RecordStore,
    id: CustomerId,
    changes: CustomerChanges,
) -> PipelineResult<Customer> {
    let patch = validate::validate_changes(changes).inspect_err(log_rejected)?;

    let mut rec = get(&*store, id)?;

    if let Some(email) = patch.changes_email(&rec) {
        let owner = store.get_by_email(email).map_err(store_failure)?;
        if owner.is_some_and(|other| other.id != id) {
            debug!(id, email, "update rejected: email already registered");
            return Err(PipelineError::DuplicateKey {
                field: "email",
                value: email.to_string(),
            });
        }
    }

    store.update(id, &patch).map_err(store_failure)?;
    patch.apply_to(&mut rec);
    info!(id, "customer updated");
    Ok(rec)
}

/// Permanently removes a record. A second delete of the same id is `NotFound`.
pub fn delete(store: &mut dyn RecordStore, id: CustomerId) -> PipelineResult<()> {
    get(&*store, id)?;
    store.delete(id).map_err(store_failure)?;
    info!(id, "customer deleted");
    Ok(())
}

fn store_failure(err: StoreError) -> PipelineError {
    let err = PipelineError::from(err);
    if let PipelineError::StoreUnavailable(inner) = &err {
        warn!(error = %inner, "record store failure");
    }
    err
}

fn log_rejected(err: &PipelineError) {
    debug!(kind = err.kind(), error = %err, "request rejected");
}
