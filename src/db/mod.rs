pub mod memory;
pub mod repository;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use thiserror::Error;

use crate::models::{NewTodo, NewUser, Todo, TodoChanges, User};
use crate::pagination::{Page, Pagination};

pub use memory::MemoryStore;
pub use repository::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
}

/// Task store. Every `owner` argument narrows the operation to one user's
/// todos; `None` means all todos.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert_todo(&self, owner_id: &str, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Newest first.
    async fn list_todos(
        &self,
        owner: Option<&str>,
        pagination: Pagination,
    ) -> Result<Page<Todo>, StoreError>;

    async fn find_todo(&self, id: &str, owner: Option<&str>) -> Result<Option<Todo>, StoreError>;

    /// `Ok(None)` when no matching todo exists; nothing is written then.
    async fn update_todo(
        &self,
        id: &str,
        owner: Option<&str>,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, StoreError>;

    async fn delete_todo(&self, id: &str, owner: Option<&str>) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait Store: UserStore + TodoStore {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Fixed-width RFC 3339 so stored timestamps sort lexically.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
