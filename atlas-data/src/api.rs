//! Data API operations as an async trait
//!
//! [`AtlasDataClient`](crate::AtlasDataClient) is the HTTP implementation.
//! Anything else implementing [`DataApi`] (an in-process fake, for example)
//! gets the same connectivity probe for free.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AtlasError, Result, AUTHENTICATION_FAILED_MESSAGE};
use crate::types::{
    AggregateResult, DeleteResult, FindOneResult, FindOptions, FindResult, InsertManyResult,
    InsertOneResult, UpdateResult,
};

/// Outcome of [`DataApi::test_connection`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub message: String,
}

impl ConnectionStatus {
    pub fn connected() -> Self {
        Self {
            connected: true,
            message: "Successfully connected to MongoDB Atlas Data API".to_string(),
        }
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self {
            connected: false,
            message: message.into(),
        }
    }
}

/// The nine Atlas Data API operations
///
/// `filter` arguments typed `Option<Value>` default to `{}` (match all).
/// `upsert: None` leaves the field out of the request.
#[async_trait]
pub trait DataApi: Send + Sync {
    async fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: Option<Value>,
        projection: Option<Value>,
    ) -> Result<FindOneResult>;

    async fn find(
        &self,
        database: &str,
        collection: &str,
        filter: Option<Value>,
        options: FindOptions,
    ) -> Result<FindResult>;

    async fn insert_one(
        &self,
        database: &str,
        collection: &str,
        document: Value,
    ) -> Result<InsertOneResult>;

    async fn insert_many(
        &self,
        database: &str,
        collection: &str,
        documents: Vec<Value>,
    ) -> Result<InsertManyResult>;

    async fn update_one(
        &self,
        database: &str,
        collection: &str,
        filter: Value,
        update: Value,
        upsert: Option<bool>,
    ) -> Result<UpdateResult>;

    async fn update_many(
        &self,
        database: &str,
        collection: &str,
        filter: Value,
        update: Value,
        upsert: Option<bool>,
    ) -> Result<UpdateResult>;

    async fn delete_one(&self, database: &str, collection: &str, filter: Value)
        -> Result<DeleteResult>;

    async fn delete_many(
        &self,
        database: &str,
        collection: &str,
        filter: Value,
    ) -> Result<DeleteResult>;

    async fn aggregate(
        &self,
        database: &str,
        collection: &str,
        pipeline: Vec<Value>,
    ) -> Result<AggregateResult>;

    /// Best-effort connectivity probe
    ///
    /// The Data API has no health endpoint, so any answer that is not an
    /// authentication failure counts as connected:
    ///
    /// 1. `find` on `admin.system.version` with `limit: 1`; success means connected.
    /// 2. Otherwise `find` on `test.__connection_test__`:
    ///    - success, or any other API error (e.g. 404) - connected
    ///    - authentication error - not connected
    ///    - anything else - not connected, with that error's message
    async fn test_connection(&self) -> ConnectionStatus {
        let probe = FindOptions::default().with_limit(1);

        match self
            .find("admin", "system.version", None, probe.clone())
            .await
        {
            Ok(_) => return ConnectionStatus::connected(),
            Err(err) => {
                tracing::debug!(error = %err, "admin probe failed, trying fallback collection");
            }
        }

        match self.find("test", "__connection_test__", None, probe).await {
            Ok(_) => ConnectionStatus::connected(),
            Err(AtlasError::Authentication { .. })
            | Err(AtlasError::MissingCredential { .. })
            | Err(AtlasError::InvalidCredential { .. }) => {
                ConnectionStatus::disconnected(AUTHENTICATION_FAILED_MESSAGE)
            }
            Err(AtlasError::MongoDbApi { status, .. }) => {
                tracing::debug!(status, "fallback probe reached the API");
                ConnectionStatus::connected()
            }
            Err(err) => ConnectionStatus::disconnected(err.to_string()),
        }
    }
}
