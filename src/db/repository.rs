use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use super::{Store, StoreError, TodoStore, UserStore, timestamp};
use crate::models::{NewTodo, NewUser, Todo, TodoChanges, User};
use crate::pagination::{Page, Pagination};

const TODO_COLUMNS: &str = "id, name, status, user_id, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    /// Opens (creating if needed) the database at `database_url` and applies
    /// the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }

    /// A private in-memory database. One connection that never expires, so
    /// the data lives as long as the store.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

fn map_user_insert_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = timestamp();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(map_user_insert_error)?;

        Ok(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn insert_todo(&self, owner_id: &str, todo: NewTodo) -> Result<Todo, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = timestamp();

        sqlx::query(
            r#"
            INSERT INTO todos (id, name, status, user_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&id)
        .bind(&todo.name)
        .bind(todo.status.as_str())
        .bind(owner_id)
        .bind(&now)
        .execute(&self.db)
        .await?;

        Ok(Todo {
            id,
            name: todo.name,
            status: todo.status,
            owner_id: owner_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn list_todos(
        &self,
        owner: Option<&str>,
        pagination: Pagination,
    ) -> Result<Page<Todo>, StoreError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE (?1 IS NULL OR user_id = ?1)")
                .bind(owner)
                .fetch_one(&self.db)
                .await?;

        let sql = format!(
            r#"
            SELECT {TODO_COLUMNS}
            FROM todos
            WHERE (?1 IS NULL OR user_id = ?1)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2 OFFSET ?3
            "#
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(owner)
            .bind(i64::from(pagination.limit))
            .bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.db)
            .await?;

        Ok(Page::new(todos, total.max(0) as u64, pagination))
    }

    async fn find_todo(&self, id: &str, owner: Option<&str>) -> Result<Option<Todo>, StoreError> {
        let sql =
            format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)");
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.db)
            .await?;
        Ok(todo)
    }

    async fn update_todo(
        &self,
        id: &str,
        owner: Option<&str>,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        // Merge and write in one statement; no matching row means not found.
        let sql = format!(
            r#"
            UPDATE todos
            SET name = COALESCE(?1, name),
                status = COALESCE(?2, status),
                updated_at = ?3
            WHERE id = ?4 AND (?5 IS NULL OR user_id = ?5)
            RETURNING {TODO_COLUMNS}
            "#
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(changes.name)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(timestamp())
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.db)
            .await?;

        Ok(todo)
    }

    async fn delete_todo(&self, id: &str, owner: Option<&str>) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(result > 0)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("select 1").execute(&self.db).await?;
        Ok(())
    }
}
