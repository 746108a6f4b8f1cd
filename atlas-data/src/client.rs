//! HTTP client for the Atlas Data API

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::action::Action;
use crate::api::DataApi;
use crate::credentials::TenantCredentials;
use crate::error::{AtlasError, Result};
use crate::types::{
    AggregateResult, DeleteResult, FindOneResult, FindOptions, FindResult, InsertManyResult,
    InsertOneResult, UpdateResult,
};

/// Seconds to wait when a 429 carries no usable `Retry-After` header
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Client bound to one tenant's credentials
///
/// Build one per request with [`AtlasDataClient::new`] and drop it when the
/// request ends. Each logical operation is exactly one `POST`; nothing is
/// retried, batched or cached.
pub struct AtlasDataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: HeaderValue,
    data_source: String,
}

/// Envelope shared by every action body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionRequest<'a, B> {
    data_source: &'a str,
    database: &'a str,
    collection: &'a str,
    #[serde(flatten)]
    body: B,
}

#[derive(Serialize)]
struct FindOneBody {
    filter: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<Value>,
}

#[derive(Serialize)]
struct FindBody {
    filter: Value,
    #[serde(flatten)]
    options: FindOptions,
}

#[derive(Serialize)]
struct DocumentBody {
    document: Value,
}

#[derive(Serialize)]
struct DocumentsBody {
    documents: Vec<Value>,
}

#[derive(Serialize)]
struct UpdateBody {
    filter: Value,
    update: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    upsert: Option<bool>,
}

#[derive(Serialize)]
struct FilterBody {
    filter: Value,
}

#[derive(Serialize)]
struct PipelineBody {
    pipeline: Vec<Value>,
}

impl AtlasDataClient {
    /// Create a client for the given tenant
    ///
    /// Fails with [`AtlasError::MissingCredential`] before any network
    /// activity if the API key, App ID or data source is empty, and with
    /// [`AtlasError::InvalidCredential`] if the API key is not a valid
    /// header value.
    pub fn new(credentials: &TenantCredentials) -> Result<Self> {
        credentials.validate()?;

        let mut api_key = HeaderValue::from_str(&credentials.api_key)
            .map_err(|_| AtlasError::InvalidCredential { name: "apiKey" })?;
        api_key.set_sensitive(true);

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: credentials.resolved_base_url(),
            api_key,
            data_source: credentials.data_source.clone(),
        })
    }

    /// Base URL this client posts to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an action
    pub fn action_url(&self, action: Action) -> String {
        format!("{}/action/{}", self.base_url, action.as_str())
    }

    async fn execute<B, R>(
        &self,
        action: Action,
        database: &str,
        collection: &str,
        body: B,
    ) -> Result<R>
    where
        B: Serialize + Send,
        R: DeserializeOwned,
    {
        let payload = ActionRequest {
            data_source: &self.data_source,
            database,
            collection,
            body,
        };
        let bytes = serde_json::to_vec(&payload)?;

        if action.is_mutation() {
            tracing::info!(
                action = %action,
                database = database,
                collection = collection,
                "Atlas Data API write"
            );
        } else {
            tracing::debug!(
                action = %action,
                database = database,
                collection = collection,
                "Atlas Data API request"
            );
        }

        let response = self
            .http
            .post(self.action_url(action))
            .header("api-key", self.api_key.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(bytes)
            .send()
            .await?;

        let value = match map_response(response).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(
                    action = %action,
                    code = err.error_code(),
                    error = %err,
                    "Atlas Data API request failed"
                );
                return Err(err);
            }
        };

        serde_json::from_value(value).map_err(|e| AtlasError::InvalidResponse {
            reason: format!("unexpected {} result: {}", action, e),
        })
    }
}

/// Map an HTTP answer to its JSON body or a typed error
async fn map_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
        return Err(AtlasError::RateLimit { retry_after });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AtlasError::authentication_failed());
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AtlasError::MongoDbApi {
            status: status.as_u16(),
            message: api_error_message(status.as_u16(), &body),
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| AtlasError::InvalidResponse {
        reason: format!("body is not JSON: {}", e),
    })
}

/// Seconds from a `Retry-After` header, or the default if absent or not a number
pub(crate) fn parse_retry_after(header: Option<&HeaderValue>) -> u64 {
    header
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Message from a JSON error body's `error` or `message` field
pub(crate) fn api_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|parsed| {
            ["error", "message"].iter().find_map(|key| {
                parsed
                    .get(*key)
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("MongoDB API error: {}", status))
}

#[async_trait]
impl DataApi for AtlasDataClient {
    async fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: Option<Value>,
        projection: Option<Value>,
    ) -> Result<FindOneResult> {
        let body = FindOneBody {
            filter: filter.unwrap_or_else(|| json!({})),
            projection,
        };
        self.execute(Action::FindOne, database, collection, body).await
    }

    async fn find(
        &self,
        database: &str,
        collection: &str,
        filter: Option<Value>,
        options: FindOptions,
    ) -> Result<FindResult> {
        let body = FindBody {
            filter: filter.unwrap_or_else(|| json!({})),
            options,
        };
        self.execute(Action::Find, database, collection, body).await
    }

    async fn insert_one(
        &self,
        database: &str,
        collection: &str,
        document: Value,
    ) -> Result<InsertOneResult> {
        self.execute(Action::InsertOne, database, collection, DocumentBody { document })
            .await
    }

    async fn insert_many(
        &self,
        database: &str,
        collection: &str,
        documents: Vec<Value>,
    ) -> Result<InsertManyResult> {
        self.execute(Action::InsertMany, database, collection, DocumentsBody { documents })
            .await
    }

    async fn update_one(
        &self,
        database: &str,
        collection: &str,
        filter: Value,
        update: Value,
        upsert: Option<bool>,
    ) -> Result<UpdateResult> {
        let body = UpdateBody {
            filter,
            update,
            upsert,
        };
        self.execute(Action::UpdateOne, database, collection, body).await
    }

    async fn update_many(
        &self,
        database: &str,
        collection: &str,
        filter: Value,
        update: Value,
        upsert: Option<bool>,
    ) -> Result<UpdateResult> {
        let body = UpdateBody {
            filter,
            update,
            upsert,
        };
        self.execute(Action::UpdateMany, database, collection, body).await
    }

    async fn delete_one(
        &self,
        database: &str,
        collection: &str,
        filter: Value,
    ) -> Result<DeleteResult> {
        self.execute(Action::DeleteOne, database, collection, FilterBody { filter })
            .await
    }

    async fn delete_many(
        &self,
        database: &str,
        collection: &str,
        filter: Value,
    ) -> Result<DeleteResult> {
        self.execute(Action::DeleteMany, database, collection, FilterBody { filter })
            .await
    }

    async fn aggregate(
        &self,
        database: &str,
        collection: &str,
        pipeline: Vec<Value>,
    ) -> Result<AggregateResult> {
        self.execute(Action::Aggregate, database, collection, PipelineBody { pipeline })
            .await
    }
}
