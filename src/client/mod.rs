//! Client side of the todo service: a typed HTTP client plus the state a
//! browser front end keeps (session token, form validation, route guard and
//! the dashboard).

pub mod dashboard;
pub mod forms;
pub mod routes;
pub mod session;

pub use dashboard::{Dashboard, TodoDraft};
pub use forms::{FormErrors, LoginForm, RegisterForm};
pub use routes::{Screen, resolve_route};
pub use session::SessionStore;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::api::dto::{AuthResponse, MessageResponse, TodoListResponse, TodoResponse, UserResponse};
use crate::models::{NewTodoRequest, PublicUser, Todo, TodoStatus, UpdateTodoRequest};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("not logged in")]
    NotAuthenticated,

    #[error("form has invalid fields")]
    Validation(FormErrors),

    #[error("session storage error: {0}")]
    Session(#[from] std::io::Error),

    #[error("session data is corrupt: {0}")]
    SessionFormat(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of an API-level failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Result<Self, ClientError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.to_string());
        debug!("api error {}: {}", status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<AuthResponse, ClientError> {
        let errors = form.errors();
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }

        let response = self
            .http
            .post(self.url("/user/register"))
            .json(&form.to_request())
            .send()
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        self.session.save(&auth.token)?;
        Ok(auth)
    }

    pub async fn login(&self, form: &LoginForm) -> Result<AuthResponse, ClientError> {
        let errors = form.errors();
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }

        let response = self
            .http
            .post(self.url("/user/login"))
            .json(&form.to_request())
            .send()
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        self.session.save(&auth.token)?;
        Ok(auth)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()
    }

    pub async fn current_user(&self) -> Result<PublicUser, ClientError> {
        let request = self.authorized(self.http.get(self.url("/user/getuser")))?;
        let body: UserResponse = Self::decode(request.send().await?).await?;
        Ok(body.user)
    }

    pub async fn add_todo(&self, name: &str, status: TodoStatus) -> Result<Todo, ClientError> {
        let body = NewTodoRequest {
            name: Some(name.to_string()),
            status: Some(status.as_str().to_string()),
        };
        let request = self.authorized(self.http.post(self.url("/todo/add")))?;
        let body: TodoResponse = Self::decode(request.json(&body).send().await?).await?;
        Ok(body.todo)
    }

    pub async fn list_todos(&self, page: u32, limit: u32) -> Result<TodoListResponse, ClientError> {
        let url = self.url(&format!("/todo/get-all?page={page}&limit={limit}"));
        let request = self.authorized(self.http.get(url))?;
        Self::decode(request.send().await?).await
    }

    pub async fn update_todo(
        &self,
        id: &str,
        name: Option<&str>,
        status: Option<TodoStatus>,
    ) -> Result<Todo, ClientError> {
        let body = UpdateTodoRequest {
            name: name.map(str::to_string),
            status: status.map(|s| s.as_str().to_string()),
        };
        let request = self.authorized(self.http.put(self.url(&format!("/todo/update/{id}"))))?;
        let body: TodoResponse = Self::decode(request.json(&body).send().await?).await?;
        Ok(body.todo)
    }

    pub async fn delete_todo(&self, id: &str) -> Result<(), ClientError> {
        let request = self.authorized(self.http.delete(self.url(&format!("/todo/delete/{id}"))))?;
        let _: MessageResponse = Self::decode(request.send().await?).await?;
        Ok(())
    }
}
