//! JSON-RPC endpoint with per-request credentials

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use atlas_data::TenantCredentials;
use atlas_mcp::{McpRequest, McpResponse};

use crate::AppState;

pub const HEADER_API_KEY: &str = "x-mongodb-api-key";
pub const HEADER_APP_ID: &str = "x-mongodb-app-id";
pub const HEADER_DATA_SOURCE: &str = "x-mongodb-data-source";
pub const HEADER_BASE_URL: &str = "x-mongodb-base-url";

const REQUIRED_HEADERS: [&str; 3] = [HEADER_API_KEY, HEADER_APP_ID, HEADER_DATA_SOURCE];

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn credentials_from(headers: &HeaderMap) -> TenantCredentials {
    let credentials = TenantCredentials::new(
        header(headers, HEADER_API_KEY).unwrap_or_default(),
        header(headers, HEADER_APP_ID).unwrap_or_default(),
        header(headers, HEADER_DATA_SOURCE).unwrap_or_default(),
    );
    match header(headers, HEADER_BASE_URL) {
        Some(base_url) => credentials.with_base_url(base_url),
        None => credentials,
    }
}

/// First mandatory credential header that is absent or blank
fn missing_header(headers: &HeaderMap) -> Option<&'static str> {
    REQUIRED_HEADERS
        .into_iter()
        .find(|name| header(headers, name).is_none())
}

/// POST /mcp
pub async fn handle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request: McpRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable request body");
            return Json(McpResponse::parse_error(&e)).into_response();
        }
    };

    if request.method == "tools/call" {
        if let Some(name) = missing_header(&headers) {
            tracing::warn!(header = name, "tools/call without credentials");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": format!("Missing required header: {}", name) })),
            )
                .into_response();
        }
    }

    let credentials = credentials_from(&headers);
    match state.mcp.handle_request(request, &credentials).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
