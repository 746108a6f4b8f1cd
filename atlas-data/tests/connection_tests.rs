//! Connectivity probe heuristics

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use atlas_data::{
    AggregateResult, AtlasError, DataApi, DeleteResult, FindOneResult, FindOptions, FindResult,
    InsertManyResult, InsertOneResult, Result, UpdateResult,
};

/// Fake whose `find` answers come from a script
struct ScriptedFind {
    answers: Mutex<VecDeque<Result<FindResult>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedFind {
    fn new(answers: Vec<Result<FindResult>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataApi for ScriptedFind {
    async fn find_one(&self, _: &str, _: &str, _: Option<Value>, _: Option<Value>) -> Result<FindOneResult> {
        unimplemented!()
    }

    async fn find(&self, database: &str, collection: &str, _: Option<Value>, options: FindOptions) -> Result<FindResult> {
        assert_eq!(options.limit, Some(1));
        self.calls
            .lock()
            .unwrap()
            .push((database.to_string(), collection.to_string()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected find call")
    }

    async fn insert_one(&self, _: &str, _: &str, _: Value) -> Result<InsertOneResult> {
        unimplemented!()
    }

    async fn insert_many(&self, _: &str, _: &str, _: Vec<Value>) -> Result<InsertManyResult> {
        unimplemented!()
    }

    async fn update_one(&self, _: &str, _: &str, _: Value, _: Value, _: Option<bool>) -> Result<UpdateResult> {
        unimplemented!()
    }

    async fn update_many(&self, _: &str, _: &str, _: Value, _: Value, _: Option<bool>) -> Result<UpdateResult> {
        unimplemented!()
    }

    async fn delete_one(&self, _: &str, _: &str, _: Value) -> Result<DeleteResult> {
        unimplemented!()
    }

    async fn delete_many(&self, _: &str, _: &str, _: Value) -> Result<DeleteResult> {
        unimplemented!()
    }

    async fn aggregate(&self, _: &str, _: &str, _: Vec<Value>) -> Result<AggregateResult> {
        unimplemented!()
    }
}

fn api_error(status: u16) -> AtlasError {
    AtlasError::MongoDbApi {
        status,
        message: format!("MongoDB API error: {}", status),
    }
}

#[tokio::test]
async fn test_first_probe_success_is_connected() {
    let api = ScriptedFind::new(vec![Ok(FindResult::default())]);

    let status = api.test_connection().await;

    assert!(status.connected);
    assert_eq!(
        api.calls(),
        vec![("admin".to_string(), "system.version".to_string())]
    );
}

#[tokio::test]
async fn test_fallback_success_is_connected() {
    let api = ScriptedFind::new(vec![Err(api_error(403)), Ok(FindResult::default())]);

    let status = api.test_connection().await;

    assert!(status.connected);
    assert_eq!(api.calls()[1], ("test".to_string(), "__connection_test__".to_string()));
}

#[tokio::test]
async fn test_fallback_api_error_counts_as_connected() {
    let api = ScriptedFind::new(vec![Err(api_error(500)), Err(api_error(404))]);

    let status = api.test_connection().await;

    assert!(status.connected);
}

#[tokio::test]
async fn test_fallback_authentication_failure_is_disconnected() {
    let api = ScriptedFind::new(vec![
        Err(AtlasError::authentication_failed()),
        Err(AtlasError::authentication_failed()),
    ]);

    let status = api.test_connection().await;

    assert!(!status.connected);
    assert!(status.message.contains("Authentication failed"));
}

#[tokio::test]
async fn test_fallback_other_failure_reports_its_message() {
    let api = ScriptedFind::new(vec![
        Err(AtlasError::Transport("connection refused".to_string())),
        Err(AtlasError::Transport("connection refused".to_string())),
    ]);

    let status = api.test_connection().await;

    assert!(!status.connected);
    assert!(status.message.contains("connection refused"));
}

#[tokio::test]
async fn test_fallback_rate_limit_is_disconnected() {
    let api = ScriptedFind::new(vec![
        Err(AtlasError::RateLimit { retry_after: 60 }),
        Err(AtlasError::RateLimit { retry_after: 60 }),
    ]);

    let status = api.test_connection().await;

    assert!(!status.connected);
    assert!(status.message.contains("Rate limit"));
}
