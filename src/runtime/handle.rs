use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::{
    customer::{Customer, CustomerChanges, NewCustomer},
    error::{PipelineError, PipelineResult},
    pipeline::{self, Command, Outcome},
    store::RecordStore,
    types::CustomerId,
    validate::ListQuery,
};

use super::events::CustomerEvent;

/// Failure of a call made through [`CustomerHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The pipeline classified the request as failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// The store worker has stopped.
    #[error("customer service is not running")]
    ChannelClosed,
    /// The worker answered with a result of the wrong shape.
    #[error("unexpected outcome for {0}")]
    UnexpectedOutcome(&'static str),
}

/// Sizing for the worker's queues.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending requests accepted before callers wait.
    pub queue_bound: usize,
    /// Events buffered per subscriber before lagging.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable async front for the store worker.
#[derive(Clone)]
pub struct CustomerHandle {
    cmd_tx: mpsc::Sender<Request>,
    events_tx: broadcast::Sender<CustomerEvent>,
}

enum Request {
    Execute {
        cmd: Command,
        resp: oneshot::Sender<PipelineResult<Outcome>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `store` onto a dedicated blocking worker and returns its handle.
///
/// The worker is the only owner of the store; it is dropped, and any
/// database connection closed, when the worker exits on shutdown or when
/// every handle is gone. Must be called from within a tokio runtime.
pub fn spawn_service(store: Box<dyn RecordStore>, config: RuntimeConfig) -> CustomerHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Request>(config.queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<CustomerEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::task::spawn_blocking(move || {
        let mut store = store;
        info!(queue_bound = config.queue_bound, "customer store worker started");

        while let Some(req) = cmd_rx.blocking_recv() {
            match req {
                Request::Execute { cmd, resp } => {
                    let name = cmd.name();
                    let res = pipeline::execute(store.as_mut(), cmd);
                    if let Ok(outcome) = &res {
                        if let Some(evt) = event_for(name, outcome) {
                            let _ = events_tx_loop.send(evt);
                        }
                    }
                    if resp.send(res).is_err() {
                        debug!(op = name, "caller went away before the reply");
                    }
                }
                Request::Shutdown { resp } => {
                    drop(store);
                    let _ = resp.send(());
                    info!("customer store worker stopped");
                    return;
                }
            }
        }

        info!("customer store worker stopped: all handles dropped");
    });

    CustomerHandle { cmd_tx, events_tx }
}

impl CustomerHandle {
    /// Subscribes to write events.
    pub fn subscribe(&self) -> broadcast::Receiver<CustomerEvent> {
        self.events_tx.subscribe()
    }

    /// Runs any command through the worker.
    pub async fn execute(&self, cmd: Command) -> Result<Outcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Request::Execute { cmd, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await
            .map_err(|_| RuntimeError::ChannelClosed)?
            .map_err(RuntimeError::from)
    }

    /// Creates a customer.
    pub async fn create(&self, input: NewCustomer) -> Result<Customer, RuntimeError> {
        match self.execute(Command::Create(input)).await? {
            Outcome::Customer(rec) => Ok(rec),
            _ => Err(RuntimeError::UnexpectedOutcome("create")),
        }
    }

    /// Fetches a customer by id.
    pub async fn get(&self, id: CustomerId) -> Result<Customer, RuntimeError> {
        match self.execute(Command::Get(id)).await? {
            Outcome::Customer(rec) => Ok(rec),
            _ => Err(RuntimeError::UnexpectedOutcome("get")),
        }
    }

    /// Lists customers by page or date range.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Customer>, RuntimeError> {
        match self.execute(Command::List(query)).await? {
            Outcome::Customers(rows) => Ok(rows),
            _ => Err(RuntimeError::UnexpectedOutcome("list")),
        }
    }

    /// Applies a partial update.
    pub async fn update(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> Result<Customer, RuntimeError> {
        match self.execute(Command::Update { id, changes }).await? {
            Outcome::Customer(rec) => Ok(rec),
            _ => Err(RuntimeError::UnexpectedOutcome("update")),
        }
    }

    /// Deletes a customer.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RuntimeError> {
        match self.execute(Command::Delete(id)).await? {
            Outcome::Deleted(_) => Ok(()),
            _ => Err(RuntimeError::UnexpectedOutcome("delete")),
        }
    }

    /// Stops the worker and releases the store.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Request::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn event_for(op: &str, outcome: &Outcome) -> Option<CustomerEvent> {
    match (op, outcome) {
        ("create", Outcome::Customer(rec)) => Some(CustomerEvent::Created { id: rec.id }),
        ("update", Outcome::Customer(rec)) => Some(CustomerEvent::Updated { id: rec.id }),
        (_, Outcome::Deleted(id)) => Some(CustomerEvent::Deleted { id: *id }),
        _ => None,
    }
}
