use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, TodoStore, UserStore, timestamp};
use crate::models::{NewTodo, NewUser, Todo, TodoChanges, User};
use crate::pagination::{Page, Pagination};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // Insertion order, which is also creation order.
    todos: Vec<Todo>,
}

/// Process-local store with the same semantics as [`super::SqliteStore`].
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by(todo: &Todo, owner: Option<&str>) -> bool {
    owner.is_none_or(|owner| todo.owner_id == owner)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = timestamp();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now.clone(),
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_todo(&self, owner_id: &str, todo: NewTodo) -> Result<Todo, StoreError> {
        let now = timestamp();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            name: todo.name,
            status: todo.status,
            owner_id: owner_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.tables.write().await.todos.push(todo.clone());
        Ok(todo)
    }

    async fn list_todos(
        &self,
        owner: Option<&str>,
        pagination: Pagination,
    ) -> Result<Page<Todo>, StoreError> {
        let tables = self.tables.read().await;
        let matching: Vec<&Todo> = tables
            .todos
            .iter()
            .rev()
            .filter(|t| owned_by(t, owner))
            .collect();

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.limit as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, total, pagination))
    }

    async fn find_todo(&self, id: &str, owner: Option<&str>) -> Result<Option<Todo>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .find(|t| t.id == id && owned_by(t, owner))
            .cloned())
    }

    async fn update_todo(
        &self,
        id: &str,
        owner: Option<&str>,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(todo) = tables
            .todos
            .iter_mut()
            .find(|t| t.id == id && owned_by(t, owner))
        else {
            return Ok(None);
        };

        changes.apply(todo);
        todo.updated_at = timestamp();
        Ok(Some(todo.clone()))
    }

    async fn delete_todo(&self, id: &str, owner: Option<&str>) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables.todos.retain(|t| !(t.id == id && owned_by(t, owner)));
        Ok(tables.todos.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
