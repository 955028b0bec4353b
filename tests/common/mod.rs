#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use todo_api::api::router;
use todo_api::auth::{AuthConfig, AuthService};
use todo_api::config::TodoOwnership;
use todo_api::db::SqliteStore;
use todo_api::state::AppState;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

/// Cheap hashing so tests stay fast.
pub fn auth_config(secret: &str) -> AuthConfig {
    AuthConfig {
        hash_iterations: 1,
        hash_memory_kib: 64,
        ..AuthConfig::new(secret)
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: SqliteStore,
}

impl TestApp {
    pub async fn new(ownership: TodoOwnership) -> Self {
        let store = SqliteStore::in_memory()
            .await
            .expect("Failed to create database");
        let auth = AuthService::new(auth_config(SECRET)).expect("Failed to build auth service");
        let state = AppState::new(Arc::new(store.clone()), auth, ownership);
        Self {
            router: router(state),
            store,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };
        (status, value)
    }

    /// Registers a user and returns `(token, user id)`.
    pub async fn register(&self, name: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/user/register",
                None,
                Some(json!({ "name": name, "email": email, "password": "hunter22" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn add_todo(&self, token: &str, name: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/todo/add",
                Some(token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add failed: {body}");
        body["todo"].clone()
    }
}
