use serde::{Deserialize, Serialize};

use crate::models::{PublicUser, Todo};
use crate::pagination::Page;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Answer to register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoResponse {
    pub success: bool,
    pub message: String,
    pub todo: Todo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListResponse {
    pub success: bool,
    pub todos: Vec<Todo>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

impl From<Page<Todo>> for TodoListResponse {
    fn from(page: Page<Todo>) -> Self {
        Self {
            success: true,
            todos: page.items,
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}
