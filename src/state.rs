use std::sync::Arc;

use crate::auth::{AuthService, AuthUser};
use crate::config::TodoOwnership;
use crate::db::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<AuthService>,
    pub ownership: TodoOwnership,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, auth: AuthService, ownership: TodoOwnership) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
            ownership,
        }
    }

    /// Owner filter applied to todo reads and writes made by `user`.
    pub fn todo_scope<'a>(&self, user: &'a AuthUser) -> Option<&'a str> {
        match self.ownership {
            TodoOwnership::Shared => None,
            TodoOwnership::Owner => Some(user.id.as_str()),
        }
    }
}
