//! HTTP transport tests

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use atlas_mcp::Limits;
use atlas_server::routes::{create_router, HEADER_API_KEY, HEADER_APP_ID, HEADER_BASE_URL, HEADER_DATA_SOURCE};
use atlas_server::AppState;

fn app() -> Router {
    create_router(Arc::new(AppState::new(Limits::default())), true)
}

fn rpc(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[derive(Default)]
struct Seen {
    action: Option<String>,
    api_key: Option<String>,
    body: Option<Value>,
}

/// Minimal Data API answering every action with the same document list
async fn spawn_data_api(documents: Value) -> (String, Arc<Mutex<Seen>>) {
    let seen = Arc::new(Mutex::new(Seen::default()));

    async fn action(
        State((seen, documents)): State<(Arc<Mutex<Seen>>, Value)>,
        Path(action): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let mut seen = seen.lock().unwrap();
        seen.action = Some(action);
        seen.api_key = headers
            .get("api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        seen.body = Some(body);
        Json(json!({ "documents": documents }))
    }

    let router = Router::new()
        .route("/action/:action", post(action))
        .with_state((Arc::clone(&seen), documents));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "mongodb-atlas-data-api");
    assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_tools_list_needs_no_credentials() {
    let response = app()
        .oneshot(rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["result"]["tools"].as_array().unwrap().len(), 13);
}

#[tokio::test]
async fn test_tools_call_without_credentials_is_unauthorized() {
    let response = app()
        .oneshot(rpc(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "mongodb_count", "arguments": {"database": "shop", "collection": "orders"}}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Missing required header: x-mongodb-api-key");
}

#[tokio::test]
async fn test_tools_call_names_first_missing_header() {
    let mut request = rpc(json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "tools/call",
        "params": {"name": "mongodb_test_connection"}
    }));
    request
        .headers_mut()
        .insert(HEADER_API_KEY, "key".parse().unwrap());

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Missing required header: x-mongodb-app-id");
}

#[tokio::test]
async fn test_notification_is_accepted() {
    let response = app()
        .oneshot(rpc(json!({"jsonrpc": "2.0", "method": "notifications/initialized"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from("{\"jsonrpc\": "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["error"]["code"], -32700);
}

#[tokio::test]
async fn test_tools_call_uses_header_credentials() {
    let (base_url, seen) = spawn_data_api(json!([{"count": 3}])).await;

    let mut request = rpc(json!({
        "jsonrpc": "2.0",
        "id": 4,
        "method": "tools/call",
        "params": {
            "name": "mongodb_count",
            "arguments": {"database": "shop", "collection": "orders", "filter": "{\"paid\": true}"}
        }
    }));
    let headers = request.headers_mut();
    headers.insert(HEADER_API_KEY, "tenant-key".parse().unwrap());
    headers.insert(HEADER_APP_ID, "data-tenant".parse().unwrap());
    headers.insert(HEADER_DATA_SOURCE, "Cluster7".parse().unwrap());
    headers.insert(HEADER_BASE_URL, base_url.parse().unwrap());

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    let result = &json["result"];
    assert!(result.get("isError").is_none());
    let payload: Value = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(payload["count"], 3);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.action.as_deref(), Some("aggregate"));
    assert_eq!(seen.api_key.as_deref(), Some("tenant-key"));
    let body = seen.body.as_ref().unwrap();
    assert_eq!(body["dataSource"], "Cluster7");
    assert_eq!(body["database"], "shop");
    assert_eq!(body["pipeline"][0], json!({"$match": {"paid": true}}));
}
