//! # API Layer
//!
//! The single request wrapper every command goes through. It:
//!
//! - adds the JSON headers (caller headers win on conflict),
//! - keeps the loading indicator up for the duration of the call,
//! - decodes the JSON body,
//! - turns non-2xx statuses into [`PessoasError::Api`] and missing responses
//!   into [`PessoasError::Network`],
//! - pushes an error toast for **every** failure before handing the error
//!   back, so callers never notify a second time.
//!
//! ## Loading Indicator
//!
//! [`LoadingTracker`] counts requests in flight instead of flipping a flag,
//! so two overlapping requests keep the indicator up until the slower one
//! finishes. The count is released by a guard, which covers every exit path,
//! early returns and panics included.

use crate::error::{PessoasError, Result};
use crate::notify::Notifications;
use crate::transport::{ApiRequest, Method, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub const EXPORT_SEGMENT: &str = "exportar";

/// Reference count of requests in flight.
#[derive(Clone, Default)]
pub struct LoadingTracker {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ApiClient<T: Transport> {
    transport: T,
    resource: String,
    loading: LoadingTracker,
    notifications: Notifications,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, resource: &str, notifications: Notifications) -> Self {
        Self {
            transport,
            resource: format!("/{}", resource.trim_matches('/')),
            loading: LoadingTracker::new(),
            notifications,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn loading(&self) -> &LoadingTracker {
        &self.loading
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn collection_path(&self) -> String {
        self.resource.clone()
    }

    pub fn item_path(&self, id: u64) -> String {
        format!("{}/{}", self.resource, id)
    }

    pub fn export_path(&self) -> String {
        format!("{}/{}", self.resource, EXPORT_SEGMENT)
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(ApiRequest::new(Method::Get, path)).await
    }

    pub async fn get_as<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.request_as(ApiRequest::new(Method::Get, path)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.post_as(path, body).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.put_as(path, body).await
    }

    pub async fn post_as<R: DeserializeOwned>(&self, path: &str, body: Value) -> Result<R> {
        self.request_as(ApiRequest::new(Method::Post, path).with_body(body))
            .await
    }

    pub async fn put_as<R: DeserializeOwned>(&self, path: &str, body: Value) -> Result<R> {
        self.request_as(ApiRequest::new(Method::Put, path).with_body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(ApiRequest::new(Method::Delete, path)).await
    }

    /// Sends `request` and returns the decoded body.
    ///
    /// Failures are already shown to the user when this returns `Err`.
    pub async fn request(&self, request: ApiRequest) -> Result<Value> {
        self.request_as(request).await
    }

    /// Like [`request`](Self::request), decoding the body into `R`. A body
    /// that does not fit `R` is reported like any other failure.
    pub async fn request_as<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let _guard = self.loading.begin();
        let method = request.method;
        let path = request.path.clone();

        let outcome = match self.dispatch(with_json_headers(request)).await {
            Ok(value) => serde_json::from_value::<R>(value).map_err(PessoasError::from),
            Err(err) => Err(err),
        };

        outcome.map_err(|err| {
            warn!(%method, %path, error = %err, "API error");
            self.notifications.error(err.to_string());
            err
        })
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<Value> {
        debug!(method = %request.method, path = %request.path, "request");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| PessoasError::network(e.0))?;

        let parsed = parse_body(&response.body);

        if !response.is_success() {
            let message = parsed.ok().and_then(|v| {
                v.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            return Err(PessoasError::api(response.status, message));
        }

        Ok(parsed?)
    }
}

/// Default headers first, then the caller's on top.
fn with_json_headers(request: ApiRequest) -> ApiRequest {
    let caller = request.headers.clone();
    let mut merged = ApiRequest {
        headers: Vec::new(),
        ..request
    }
    .with_header("Content-Type", "application/json")
    .with_header("Accept", "application/json");
    for (name, value) in caller {
        merged = merged.with_header(name, value);
    }
    merged
}

fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}
