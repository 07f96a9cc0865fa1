use axum::{
    Json,
    extract::{
        Path, Query, RawQuery, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    customer::{Customer, CustomerChanges, NewCustomer},
    error::{FieldError, PipelineError},
    runtime::handle::CustomerHandle,
    types::CustomerId,
    validate::ListQuery,
};

use super::ApiError;

pub(super) async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Customer API" }))
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(super) async fn create_customer(
    State(handle): State<CustomerHandle>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let Json(input) = payload.map_err(malformed_body)?;
    let rec = handle.create(input).await?;
    Ok((StatusCode::CREATED, Json(rec)))
}

pub(super) async fn get_customer(
    State(handle): State<CustomerHandle>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let rec = handle.get(parse_id(&id)?).await?;
    Ok(Json(rec))
}

pub(super) async fn list_customers(
    State(handle): State<CustomerHandle>,
    RawQuery(raw): RawQuery,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let Query(query) = query.map_err(|rejection| malformed_query(raw.as_deref(), rejection))?;
    let rows = handle.list(query).await?;
    Ok(Json(rows))
}

pub(super) async fn update_customer(
    State(handle): State<CustomerHandle>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerChanges>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    let id = parse_id(&id)?;
    let Json(changes) = payload.map_err(malformed_body)?;
    let rec = handle.update(id, changes).await?;
    Ok(Json(rec))
}

pub(super) async fn delete_customer(
    State(handle): State<CustomerHandle>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    handle.delete(parse_id(&id)?).await?;
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}

fn parse_id(text: &str) -> Result<CustomerId, ApiError> {
    text.parse::<CustomerId>().map_err(|_| {
        ApiError::from(PipelineError::Validation(vec![FieldError::new(
            "id",
            format!("{text:?} is not an integer id"),
        )]))
    })
}

fn malformed_body(rejection: JsonRejection) -> ApiError {
    ApiError::from(PipelineError::Validation(vec![FieldError::new(
        "body",
        rejection.body_text(),
    )]))
}

fn malformed_query(raw: Option<&str>, rejection: QueryRejection) -> ApiError {
    debug!(
        query = raw.unwrap_or_default(),
        error = %rejection.body_text(),
        "undecodable list query"
    );
    let param = |name: &str| {
        raw.unwrap_or_default()
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| *key == name)
            .map(|(_, value)| value)
            .collect::<Vec<_>>()
            .join(",")
    };
    ApiError::from(PipelineError::InvalidPagination {
        skip: param("skip"),
        limit: param("limit"),
    })
}
