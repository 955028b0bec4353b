use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TodoStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [
        TodoStatus::Pending,
        TodoStatus::InProgress,
        TodoStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "Pending",
            TodoStatus::InProgress => "In Progress",
            TodoStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid todo status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for TodoStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TodoStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

impl TryFrom<String> for TodoStatus {
    type Error = InvalidStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: TodoStatus,
    #[serde(rename = "user")]
    #[sqlx(rename = "user_id")]
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /todo/add`. Empty strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodoRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A name/status pair that already passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub name: String,
    pub status: TodoStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub name: Option<String>,
    pub status: Option<TodoStatus>,
}

#[derive(Debug, Validate)]
struct TodoName {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Todo name must be between 3 and 100 characters long"
    ))]
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoValidationError {
    #[error("Todo name is required")]
    MissingName,
    #[error("{0}")]
    NameLength(String),
    #[error("Status must be one of: Pending, In Progress, Completed")]
    Status(#[from] InvalidStatus),
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn validate_name(raw: String) -> Result<String, TodoValidationError> {
    let candidate = TodoName {
        name: raw.trim().to_string(),
    };
    candidate.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid todo name".to_string());
        TodoValidationError::NameLength(message)
    })?;
    Ok(candidate.name)
}

fn parse_status(raw: Option<String>) -> Result<Option<TodoStatus>, TodoValidationError> {
    present(raw)
        .map(|s| s.parse::<TodoStatus>())
        .transpose().map_err(Into::into)
}

impl NewTodoRequest {
    pub fn validate(self) -> Result<NewTodo, TodoValidationError> {
        let name = present(self.name).ok_or(TodoValidationError::MissingName)?;
        let name = validate_name(name)?;
        let status = parse_status(self.status)?.unwrap_or_default();
        Ok(NewTodo { name, status })
    }
}

impl UpdateTodoRequest {
    pub fn validate(self) -> Result<TodoChanges, TodoValidationError> {
        let name = present(self.name).map(validate_name).transpose()?;
        let status = parse_status(self.status)?;
        Ok(TodoChanges { name, status })
    }
}

impl TodoChanges {
    pub fn apply(self, todo: &mut Todo) {
        if let Some(name) = self.name {
            todo.name = name;
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
    }
}
