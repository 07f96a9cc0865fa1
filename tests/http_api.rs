use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use customerd::{
    http,
    runtime::handle::{RuntimeConfig, spawn_service},
    store::memory::MemoryStore,
};

fn app() -> Router {
    http::router(spawn_service(Box::new(MemoryStore::new()), RuntimeConfig::default()))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn john() -> Value {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": "john@example.com",
        "date_of_birth": "1990-01-01"
    })
}

#[tokio::test]
async fn root_and_health() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Welcome to the Customer API" }));

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_get_update_delete_over_http() {
    let app = app();

    let (status, created) = call(&app, Method::POST, "/customers/", Some(john())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["first_name"], "John");
    assert_eq!(created["date_of_birth"], "1990-01-01");
    let id = created["id"].as_i64().expect("id");

    let (status, fetched) = call(&app, Method::GET, &format!("/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/customers/{id}"),
        Some(json!({ "last_name": "Smith", "email": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["last_name"], "Smith");
    assert_eq!(updated["email"], "john@example.com");

    let (status, body) = call(&app, Method::DELETE, &format!("/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Customer deleted successfully" }));

    let (status, body) = call(&app, Method::DELETE, &format!("/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn failures_map_to_status_codes() {
    let app = app();
    call(&app, Method::POST, "/customers", Some(john())).await;

    let partial = json!({ "first_name": "InvalidFirstName" });
    let (status, body) = call(&app, Method::POST, "/customers", Some(partial)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_failure");
    let fields: Vec<_> = body["fields"]
        .as_array()
        .expect("fields")
        .iter()
        .map(|f| f["field"].as_str().expect("field name").to_string())
        .collect();
    assert_eq!(fields, vec!["last_name", "email", "date_of_birth"]);

    let (status, body) = call(&app, Method::POST, "/customers", Some(john())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_key");

    let (status, _) = call(&app, Method::GET, "/customers/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::GET, "/customers/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "id");

    let (status, body) = call(&app, Method::PUT, "/customers/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_update");

    let (status, body) = call(&app, Method::GET, "/customers?skip=0&limit=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_pagination");

    let uri = "/customers?start_date=2020-13-40&end_date=2020-12-31";
    let (status, body) = call(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_date_format");

    let uri = "/customers?start_date=2021-01-01&end_date=2020-01-01";
    let (status, body) = call(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_range");
}

#[tokio::test]
async fn malformed_json_is_a_validation_failure() {
    let app = app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/customers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let resp = app.oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_by_page_and_range() {
    let app = app();
    for (i, dob) in ["1990-01-01", "1995-06-15", "2000-12-31"].iter().enumerate() {
        let (status, _) = call(
            &app,
            Method::POST,
            "/customers",
            Some(json!({
                "first_name": format!("P{i}"),
                "last_name": "Lister",
                "email": format!("p{i}@example.com"),
                "date_of_birth": dob
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(&app, Method::GET, "/customers?skip=1&limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["first_name"], "P1");

    let uri = "/customers?start_date=1995-06-15&end_date=2000-12-31";
    let (status, body) = call(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["first_name"].as_str().expect("name").to_string())
        .collect();
    assert_eq!(names, vec!["P1", "P2"]);

    let (status, body) = call(&app, Method::GET, "/customers?skip=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn undecodable_list_query_is_a_json_pagination_failure() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/customers?skip=1&skip=2", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_pagination");
    assert!(body["message"].as_str().expect("message").contains("skip=1,2"));
}
