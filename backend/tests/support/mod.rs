#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Every variable the configuration layer reads.
pub const CONFIG_VARS: &[&str] = &[
    "CRM_CONFIG",
    "REPOSITORY_TYPE",
    "DATABASE_URL",
    "POSTGRES_HOST",
    "POSTGRES_USER",
    "POSTGRES_PASSWORD",
    "POSTGRES_DATABASE",
    "POSTGRES_PORT",
    "HOST",
    "PORT",
];

/// Runs `f` with environment variables temporarily modified.
///
/// Panic-safe (restores variables on unwind) and serialized, since the
/// process environment is shared by tests running in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Like [`with_scoped_env`], but starts from a clean slate: every variable in
/// [`CONFIG_VARS`] not mentioned in `changes` is removed for the duration.
pub fn with_clean_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let mut all: Vec<(&str, Option<&str>)> = CONFIG_VARS
        .iter()
        .filter(|k| !changes.iter().any(|(c, _)| c == *k))
        .map(|k| (*k, None))
        .collect();
    all.extend_from_slice(changes);
    with_scoped_env(&all, f)
}

/// Runs an async block to completion on a fresh runtime.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build test runtime")
        .block_on(future)
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

#[cfg(all(feature = "http-server", feature = "local-repo"))]
pub mod http {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use crm_backend::db::repositories::LocalRepository;
    use crm_backend::db::repository::FullRepository;
    use crm_backend::http::{create_router, AppState};

    /// Response captured from a one-shot request.
    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Vec<u8>,
    }

    impl TestResponse {
        pub fn json(&self) -> Value {
            serde_json::from_slice(&self.body).expect("response body is not JSON")
        }

        pub fn text(&self) -> String {
            String::from_utf8(self.body.clone()).expect("response body is not UTF-8")
        }
    }

    /// Router over a fresh in-memory repository, plus a handle to that repository.
    pub fn test_app() -> (Router, LocalRepository) {
        let repo = LocalRepository::new();
        let shared = Arc::new(repo.clone()) as Arc<dyn FullRepository>;
        (create_router(AppState::new(shared)), repo)
    }

    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        send_request(app, request).await
    }

    pub async fn send_request(app: &Router, request: Request<Body>) -> TestResponse {
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(app: &Router, uri: &str) -> TestResponse {
        send(app, Method::GET, uri, None).await
    }

    pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
        send(app, Method::POST, uri, Some(body)).await
    }

    pub async fn patch(app: &Router, uri: &str, body: Value) -> TestResponse {
        send(app, Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(app: &Router, uri: &str, body: Option<Value>) -> TestResponse {
        send(app, Method::DELETE, uri, body).await
    }
}
