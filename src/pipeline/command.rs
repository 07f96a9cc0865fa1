use crate::{
    customer::{Customer, CustomerChanges, NewCustomer},
    error::PipelineResult,
    store::RecordStore,
    types::CustomerId,
    validate::ListQuery,
};

/// Decoded request handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert a new customer.
    Create(NewCustomer),
    /// Fetch one customer.
    Get(CustomerId),
    /// Page or date-range listing.
    List(ListQuery),
    /// Partial update of an existing customer.
    Update {
        /// Target id.
        id: CustomerId,
        /// Supplied fields.
        changes: CustomerChanges,
    },
    /// Hard delete.
    Delete(CustomerId),
}

impl Command {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Get(_) => "get",
            Self::List(_) => "list",
            Self::Update { .. } => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Successful result of a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Create, get, and update return the full record.
    Customer(Customer),
    /// List returns a possibly empty sequence.
    Customers(Vec<Customer>),
    /// Delete confirms the removed id.
    Deleted(CustomerId),
}

/// Runs one command against `store`.
pub fn execute(store: &mut dyn RecordStore, cmd: Command) -> PipelineResult<Outcome> {
    match cmd {
        Command::Create(input) => super::create(store, input).map(Outcome::Customer),
        Command::Get(id) => super::get(store, id).map(Outcome::Customer),
        Command::List(query) => super::list(store, &query).map(Outcome::Customers),
        Command::Update { id, changes } => super::update(store, id, changes).map(Outcome::Customer),
        Command::Delete(id) => super::delete(store, id).map(|()| Outcome::Deleted(id)),
    }
}
