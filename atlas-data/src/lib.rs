//! # Atlas Data - MongoDB Atlas Data API client
//!
//! A thin, tenant-credentialed client for the MongoDB Atlas Data API:
//!
//! - **Credentials**: every client is built from a [`TenantCredentials`] value
//!   supplied with the request. Nothing is cached between requests.
//! - **Actions**: one HTTP `POST {base}/action/{action}` per logical operation
//!   (`findOne`, `find`, `insertOne`, `insertMany`, `updateOne`, `updateMany`,
//!   `deleteOne`, `deleteMany`, `aggregate`)
//! - **Errors**: HTTP statuses are normalized into [`AtlasError`]
//!   (authentication, rate limit, API error) with a retryable hint.
//!
//! ## Example
//!
//! ```rust,no_run
//! use atlas_data::{AtlasDataClient, DataApi, FindOptions, TenantCredentials};
//! use serde_json::json;
//!
//! # async fn run() -> atlas_data::Result<()> {
//! let credentials = TenantCredentials::new("api-key", "data-abcde", "Cluster0");
//! let client = AtlasDataClient::new(&credentials)?;
//!
//! let found = client
//!     .find(
//!         "shop",
//!         "orders",
//!         Some(json!({"status": "open"})),
//!         FindOptions::default().with_limit(10),
//!     )
//!     .await?;
//!
//! for document in found.documents {
//!     println!("{}", document);
//! }
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod api;
pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

pub use action::Action;
pub use api::{ConnectionStatus, DataApi};
pub use client::AtlasDataClient;
pub use credentials::{TenantCredentials, DEFAULT_DATA_API_HOST};
pub use error::{AtlasError, ErrorKind, Result};
pub use types::{
    AggregateResult, DeleteResult, FindOneResult, FindOptions, FindResult, InsertManyResult,
    InsertOneResult, UpdateResult,
};
