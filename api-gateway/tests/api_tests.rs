use account_service::AccountService;
use api_gateway::{router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing::Level;
use uuid::Uuid;

fn app() -> Router {
    router(AppState::new(AccountService::new()), Level::DEBUG)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

fn account_body(owner: &str, number: &str, balance: f64) -> Value {
    json!({
        "owner_id": owner,
        "account_number": number,
        "balance": balance,
        "account_type": "SAVINGS",
    })
}

async fn create(app: &Router, owner: &str, number: &str, balance: f64) -> String {
    let (status, body) = send(app, Method::POST, "/accounts", Some(account_body(owner, number, balance))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_returns_201_with_account() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/accounts", Some(account_body("s1", "001-1", 1000.0))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner_id"], "s1");
    assert_eq!(body["account_number"], "001-1");
    assert_eq!(body["account_type"], "SAVINGS");
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["balance"], json!(1000.0));
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_create_duplicate_returns_409() {
    let app = app();
    create(&app, "s1", "001-1", 10.0).await;

    let (status, body) = send(&app, Method::POST, "/accounts", Some(account_body("s2", "001-1", 10.0))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["message"], "account number already exists");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_invalid_bodies_return_400() {
    let app = app();
    let cases = [
        account_body("s1", "001-1", 0.0),
        account_body("s1", "001-1", -5.0),
        account_body("", "001-1", 5.0),
        account_body("s1", "", 5.0),
        json!({ "owner_id": "s1", "account_number": "001-1", "balance": 5, "account_type": "AHORRO" }),
        json!({ "owner_id": "s1", "account_number": "001-1", "balance": 5 }),
        json!({ "owner_id": "s1", "account_number": "001-1", "balance": 5, "account_type": "SAVINGS", "status": "ACTIVE" }),
    ];

    for case in cases {
        let (status, _) = send(&app, Method::POST, "/accounts", Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", case);
    }

    let (status, body) = send(&app, Method::GET, "/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_malformed_json_and_id_return_400() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/accounts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/accounts/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_get_update_and_delete() {
    let app = app();
    let id = create(&app, "s1", "001-1", 2000.0).await;

    let (status, body) = send(&app, Method::GET, &format!("/accounts/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account_number"], "001-1");

    let update = json!({
        "owner_id": "s1",
        "account_number": "001-9",
        "balance": 3500,
        "account_type": "CHECKING",
    });
    let (status, body) = send(&app, Method::PUT, &format!("/accounts/{}", id), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account_number"], "001-9");
    assert_eq!(body["account_type"], "CHECKING");
    assert_eq!(body["balance"], json!(3500.0));

    let (status, body) = send(&app, Method::DELETE, &format!("/accounts/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &format!("/accounts/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "account not found");

    let (status, _) = send(&app, Method::DELETE, &format!("/accounts/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_conflicts_and_missing() {
    let app = app();
    let id = create(&app, "s1", "001-1", 10.0).await;
    create(&app, "s2", "002-1", 10.0).await;

    let (status, body) = send(&app, Method::PUT, &format!("/accounts/{}", id), Some(account_body("s1", "002-1", 10.0))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "account number already in use");

    let missing = format!("/accounts/{}", Uuid::new_v4());
    let (status, _) = send(&app, Method::PUT, &missing, Some(account_body("s1", "003-1", 10.0))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_withdraw_and_deposit() {
    let app = app();
    let id = create(&app, "s1", "001-1", 5000.0).await;

    let (status, body) = send(&app, Method::POST, &format!("/accounts/{}/deposit", id), Some(json!({ "amount": 1000 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], json!(6000.0));

    let (status, body) = send(&app, Method::POST, &format!("/accounts/{}/withdraw", id), Some(json!({ "amount": 500.5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], json!(5499.5));

    let (status, body) = send(&app, Method::POST, &format!("/accounts/{}/withdraw", id), Some(json!({ "amount": 10000 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "insufficient balance");

    let (status, _) = send(&app, Method::POST, &format!("/accounts/{}/deposit", id), Some(json!({ "amount": -100 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, &format!("/accounts/{}/deposit", Uuid::new_v4()), Some(json!({ "amount": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_amounts_are_client_errors() {
    let app = app();

    let (status, _) = send(&app, Method::POST, "/accounts", Some(account_body("s1", "001-1", 7e28))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = create(&app, "s1", "001-1", 9e15).await;

    let (status, body) = send(&app, Method::POST, &format!("/accounts/{}/deposit", id), Some(json!({ "amount": 7e28 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, body) = send(&app, Method::POST, &format!("/accounts/{}/deposit", id), Some(json!({ "amount": 2e15 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "balance limit exceeded");

    let (_, body) = send(&app, Method::GET, &format!("/accounts/{}", id), None).await;
    assert_eq!(body["balance"], json!(9e15));
}

#[tokio::test]
async fn test_suspended_account_listing_and_transactions() {
    let app = app();
    let active = create(&app, "s1", "001-1", 100.0).await;
    let suspended = create(&app, "s1", "001-2", 100.0).await;

    let (status, body) = send(&app, Method::PUT, &format!("/accounts/{}/status", suspended), Some(json!({ "status": "SUSPENDED" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUSPENDED");

    let (status, body) = send(&app, Method::POST, &format!("/accounts/{}/deposit", suspended), Some(json!({ "amount": 1 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "account not active");

    let (_, all) = send(&app, Method::GET, "/accounts", None).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["id"], active.as_str());

    let (status, owned) = send(&app, Method::GET, "/accounts/owner/s1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owned.as_array().unwrap().len(), 2);

    let (status, none) = send(&app, Method::GET, "/accounts/owner/nobody", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, json!([]));

    let (status, _) = send(&app, Method::PUT, &format!("/accounts/{}/status", active), Some(json!({ "status": "CANCELLED" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_docs_and_health() {
    let app = app();

    let response = app.clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("depositForm"));

    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/accounts/{id}/withdraw"].is_object());

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
