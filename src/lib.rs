//! Customer record service: a validated mutation pipeline over a relational table.
//!
//! # Examples
//!
//! Direct pipeline usage with [`store::memory::MemoryStore`]:
//! ```
//! use customerd::{
//!     customer::{CustomerChanges, NewCustomer},
//!     pipeline,
//!     store::memory::MemoryStore,
//! };
//!
//! let mut store = MemoryStore::new();
//! let rec = pipeline::create(&mut store, NewCustomer {
//!     first_name: Some("Ada".to_string()),
//!     last_name: Some("Lovelace".to_string()),
//!     email: Some("ada@example.com".to_string()),
//!     date_of_birth: Some("1815-12-10".to_string()),
//! }).expect("create");
//! assert_eq!(rec.id, 1);
//!
//! let rec = pipeline::update(&mut store, rec.id, CustomerChanges {
//!     last_name: Some("King".to_string()),
//!     ..CustomerChanges::default()
//! }).expect("update");
//! assert_eq!(rec.first_name, "Ada");
//! ```
//!
//! Runtime usage with a SQLite store:
//! ```no_run
//! use customerd::{
//!     customer::NewCustomer,
//!     runtime::handle::{spawn_service, RuntimeConfig},
//!     store::sqlite::SqliteStore,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = SqliteStore::open("customers.db").expect("open sqlite");
//! let handle = spawn_service(Box::new(store), RuntimeConfig::default());
//! let rec = handle.create(NewCustomer {
//!     first_name: Some("Grace".to_string()),
//!     last_name: Some("Hopper".to_string()),
//!     email: Some("grace@example.com".to_string()),
//!     date_of_birth: Some("1906-12-09".to_string()),
//! }).await.expect("create");
//! println!("created {}", rec.id);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// File and environment configuration.
pub mod config;
/// Customer record, payloads, and patches.
pub mod customer;
/// Pipeline failure taxonomy.
pub mod error;
/// HTTP router and handlers.
pub mod http;
/// Tracing subscriber setup.
pub mod logging;
/// Validation, uniqueness checks, and merge logic for every operation.
pub mod pipeline;
/// Store-owning worker, handle, and events.
pub mod runtime;
/// Record store trait and backends.
pub mod store;
/// Shared primitive types and constants.
pub mod types;
/// Input validation stage.
pub mod validate;
