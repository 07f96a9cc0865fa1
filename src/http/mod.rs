//! JSON-over-HTTP realization of the customer operations.
//!
//! ```text
//! GET    /                  welcome message
//! GET    /health            liveness
//! POST   /customers         create
//! GET    /customers         list (?skip=&limit= or ?start_date=&end_date=)
//! GET    /customers/{id}    fetch
//! PUT    /customers/{id}    partial update (PATCH accepted too)
//! DELETE /customers/{id}    delete
//! ```

/// Failure rendering.
pub mod error;
mod handlers;

use axum::{
    Router,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::runtime::handle::CustomerHandle;

pub use error::ApiError;

/// Builds the router over a running customer service.
pub fn router(handle: CustomerHandle) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customers/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .patch(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .with_state(handle)
        .layer(TraceLayer::new_for_http())
}
