//! Entry store client.
//!
//! Four logical operations (plus get-one) against the remote `/entries`
//! collection. Each call is exactly one round trip: no retries, no caching.
//! Every failure collapses to a [`StoreError`] carrying one display string;
//! transport and status details are logged, never shown.

use std::future::Future;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::entry::{CreateEntryRequest, Entry, UpdateEntryRequest};

pub const FETCH_ENTRIES_FAILED: &str = "Failed to fetch entries";
pub const FETCH_ENTRY_FAILED: &str = "Failed to fetch entry";
pub const CREATE_FAILED: &str = "Failed to create entry";
pub const UPDATE_FAILED: &str = "Failed to update entry";
pub const DELETE_FAILED: &str = "Failed to delete entry";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// List or get-one failed.
    #[error("{0}")]
    Fetch(String),

    /// Create or update rejected. Carries the store's own message when it sent one.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Delete(String),
}

impl StoreError {
    pub fn message(&self) -> &str {
        match self {
            StoreError::Fetch(m) | StoreError::Validation(m) | StoreError::Delete(m) => m,
        }
    }
}

/// The remote collection of entries.
pub trait EntryStore {
    fn list(&self) -> impl Future<Output = Result<Vec<Entry>, StoreError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Entry, StoreError>> + Send;

    fn create(
        &self,
        request: &CreateEntryRequest,
    ) -> impl Future<Output = Result<Entry, StoreError>> + Send;

    fn update(
        &self,
        id: i64,
        request: &UpdateEntryRequest,
    ) -> impl Future<Output = Result<Entry, StoreError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn fallback(self) -> &'static str {
        match self {
            Operation::List => FETCH_ENTRIES_FAILED,
            Operation::Get => FETCH_ENTRY_FAILED,
            Operation::Create => CREATE_FAILED,
            Operation::Update => UPDATE_FAILED,
            Operation::Delete => DELETE_FAILED,
        }
    }

    fn failure(self, message: String) -> StoreError {
        match self {
            Operation::List | Operation::Get => StoreError::Fetch(message),
            Operation::Create | Operation::Update => StoreError::Validation(message),
            Operation::Delete => StoreError::Delete(message),
        }
    }

    fn generic_failure(self) -> StoreError {
        self.failure(self.fallback().to_string())
    }

    /// Only create and update surface the store's `message`.
    fn reads_rejection_message(self) -> bool {
        matches!(self, Operation::Create | Operation::Update)
    }
}

#[derive(Deserialize)]
struct Rejection {
    message: Option<String>,
}

/// reqwest-backed client for `{base_url}/entries`.
#[derive(Debug, Clone)]
pub struct HttpEntryStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEntryStore {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/entries", self.base_url)
    }

    fn entry_url(&self, id: i64) -> String {
        format!("{}/entries/{}", self.base_url, id)
    }

    async fn send(&self, request: RequestBuilder, op: Operation) -> Result<Response, StoreError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(operation = ?op, error = %e, "Entry store unreachable");
            op.generic_failure()
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(operation = ?op, status = %status, "Entry store rejected request");

        if !op.reads_rejection_message() {
            return Err(op.generic_failure());
        }

        let message = match response.json::<Rejection>().await {
            Ok(Rejection {
                message: Some(message),
            }) if !message.is_empty() => message,
            _ => op.fallback().to_string(),
        };
        Err(op.failure(message))
    }

    async fn decode<T: DeserializeOwned>(response: Response, op: Operation) -> Result<T, StoreError> {
        response.json::<T>().await.map_err(|e| {
            tracing::warn!(operation = ?op, error = %e, "Malformed entry store response");
            op.generic_failure()
        })
    }
}

impl EntryStore for HttpEntryStore {
    async fn list(&self) -> Result<Vec<Entry>, StoreError> {
        let url = self.collection_url();
        tracing::debug!(%url, "GET entries");
        let response = self.send(self.http.get(&url), Operation::List).await?;
        Self::decode(response, Operation::List).await
    }

    async fn get(&self, id: i64) -> Result<Entry, StoreError> {
        let url = self.entry_url(id);
        tracing::debug!(%url, "GET entry");
        let response = self.send(self.http.get(&url), Operation::Get).await?;
        Self::decode(response, Operation::Get).await
    }

    async fn create(&self, request: &CreateEntryRequest) -> Result<Entry, StoreError> {
        let url = self.collection_url();
        tracing::debug!(%url, date = %request.date, "POST entry");
        let response = self
            .send(self.http.post(&url).json(request), Operation::Create)
            .await?;
        Self::decode(response, Operation::Create).await
    }

    async fn update(&self, id: i64, request: &UpdateEntryRequest) -> Result<Entry, StoreError> {
        let url = self.entry_url(id);
        tracing::debug!(%url, "PUT entry");
        let response = self
            .send(self.http.put(&url).json(request), Operation::Update)
            .await?;
        Self::decode(response, Operation::Update).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let url = self.entry_url(id);
        tracing::debug!(%url, "DELETE entry");
        self.send(self.http.delete(&url), Operation::Delete).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        http::StatusCode,
        routing::{post, put},
        Json, Router,
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use super::*;
    use crate::db::EntryRepository;
    use crate::{app, AppState};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    async fn spawn_store() -> HttpEntryStore {
        let router = app(
            AppState {
                entries: EntryRepository::memory(),
            },
            "http://localhost:3000",
        );
        HttpEntryStore::new(spawn(router).await)
    }

    fn create_request(date: &str, score: i32, note: Option<&str>) -> CreateEntryRequest {
        CreateEntryRequest {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            score,
            note: note.map(String::from),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpEntryStore::new("http://localhost:8080/api/");
        assert_eq!(store.base_url(), "http://localhost:8080/api");
        assert_eq!(store.entry_url(3), "http://localhost:8080/api/entries/3");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = spawn_store().await;
        assert_eq!(store.list().await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_create_then_list_and_get() {
        let store = spawn_store().await;
        let created = store
            .create(&create_request("2024-01-15", 4, None))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.note, None);

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(store.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_duplicate_surfaces_store_message() {
        let store = spawn_store().await;
        store
            .create(&create_request("2024-01-15", 4, None))
            .await
            .unwrap();
        let err = store
            .create(&create_request("2024-01-15", 2, None))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation("Entry already exists for date: 2024-01-15".into())
        );
    }

    #[tokio::test]
    async fn test_update_then_delete() {
        let store = spawn_store().await;
        let created = store
            .create(&create_request("2024-01-15", 4, Some("Test")))
            .await
            .unwrap();

        let updated = store
            .update(
                created.id,
                &UpdateEntryRequest {
                    score: 5,
                    note: Some("Updated".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.score, 5);
        assert_eq!(updated.date, created.date);

        store.delete(created.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_fetch_failure() {
        let store = spawn_store().await;
        let err = store.get(999).await.unwrap_err();
        assert_eq!(err, StoreError::Fetch(FETCH_ENTRY_FAILED.into()));
    }

    #[tokio::test]
    async fn test_delete_missing_uses_generic_message() {
        let store = spawn_store().await;
        let err = store.delete(999).await.unwrap_err();
        assert_eq!(err, StoreError::Delete(DELETE_FAILED.into()));
    }

    #[tokio::test]
    async fn test_create_rejection_message_shown_verbatim() {
        let router = Router::new().route(
            "/api/entries",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": "Date already exists" })),
                )
            }),
        );
        let store = HttpEntryStore::new(spawn(router).await);
        let err = store
            .create(&create_request("2024-01-15", 4, None))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Date already exists");
    }

    #[tokio::test]
    async fn test_rejection_without_message_falls_back() {
        let router = Router::new()
            .route(
                "/api/entries",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/api/entries/:id",
                put(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "error": "nope" }))) }),
            );
        let store = HttpEntryStore::new(spawn(router).await);

        let err = store
            .create(&create_request("2024-01-15", 4, None))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Validation(CREATE_FAILED.into()));

        let err = store
            .update(
                1,
                &UpdateEntryRequest {
                    score: 3,
                    note: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Validation(UPDATE_FAILED.into()));
    }

    #[tokio::test]
    async fn test_create_body_is_exact_request() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let router = Router::new().route(
            "/api/entries",
            post(move |Json(body): Json<Value>| async move {
                *captured.lock().unwrap() = Some(body);
                (
                    StatusCode::CREATED,
                    Json(json!({ "id": 1, "date": "2024-01-15", "score": 4, "note": null })),
                )
            }),
        );
        let store = HttpEntryStore::new(spawn(router).await);
        store
            .create(&create_request("2024-01-15", 4, None))
            .await
            .unwrap();

        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body, json!({ "date": "2024-01-15", "score": 4, "note": null }));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_fetch_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = HttpEntryStore::new(format!("http://{}/api", addr));
        let err = store.list().await.unwrap_err();
        assert_eq!(err, StoreError::Fetch(FETCH_ENTRIES_FAILED.into()));
    }
}
