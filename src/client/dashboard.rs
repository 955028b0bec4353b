use tracing::error;

use super::{ApiClient, ClientError};
use crate::models::{Todo, TodoStatus};
use crate::pagination::matches_filter;

/// The add/edit form. `editing` holds the id of the todo being edited, `None`
/// while adding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoDraft {
    pub editing: Option<String>,
    pub name: String,
    pub status: TodoStatus,
}

/// One page of todos as the user sees it.
#[derive(Debug)]
pub struct Dashboard {
    limit: u32,
    page: u32,
    total: u64,
    total_pages: u64,
    todos: Vec<Todo>,
    filter: String,
    draft: Option<TodoDraft>,
}

impl Dashboard {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            page: 1,
            total: 0,
            total_pages: 0,
            todos: Vec::new(),
            filter: String::new(),
            draft: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Fetches `page`. A failed fetch is logged and leaves the current page
    /// in place.
    pub async fn load(&mut self, client: &ApiClient, page: u32) {
        match client.list_todos(page.max(1), self.limit).await {
            Ok(list) => {
                self.page = list.page;
                self.total = list.total;
                self.total_pages = list.total_pages;
                self.todos = list.todos;
            }
            Err(e) => error!("Error fetching todos: {}", e),
        }
    }

    pub async fn refresh(&mut self, client: &ApiClient) {
        self.load(client, self.page).await;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    pub async fn next_page(&mut self, client: &ApiClient) {
        if self.has_next() {
            self.load(client, self.page + 1).await;
        }
    }

    pub async fn prev_page(&mut self, client: &ApiClient) {
        if self.has_prev() {
            self.load(client, self.page - 1).await;
        }
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Todos on the loaded page whose name contains the filter text.
    pub fn visible(&self) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|t| matches_filter(&t.name, &self.filter))
            .collect()
    }

    pub fn draft(&self) -> Option<&TodoDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut TodoDraft> {
        self.draft.as_mut()
    }

    pub fn open_add(&mut self) {
        self.draft = Some(TodoDraft::default());
    }

    /// Starts editing a todo from the loaded page. `false` if it is not there.
    pub fn open_edit(&mut self, id: &str) -> bool {
        let Some(todo) = self.todos.iter().find(|t| t.id == id) else {
            return false;
        };
        self.draft = Some(TodoDraft {
            editing: Some(todo.id.clone()),
            name: todo.name.clone(),
            status: todo.status,
        });
        true
    }

    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }

    /// Saves the open draft. Returns `Ok(None)` without calling the server
    /// when there is no draft or its name is empty. On failure the draft
    /// stays open so the user can retry.
    pub async fn submit_draft(&mut self, client: &ApiClient) -> Result<Option<Todo>, ClientError> {
        let Some(draft) = self.draft.clone().filter(|d| !d.name.trim().is_empty()) else {
            return Ok(None);
        };

        let saved = match draft.editing {
            Some(id) => {
                let todo = client
                    .update_todo(&id, Some(&draft.name), Some(draft.status))
                    .await?;
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
                    *slot = todo.clone();
                }
                todo
            }
            None => {
                let todo = client.add_todo(&draft.name, draft.status).await?;
                self.load(client, 1).await;
                todo
            }
        };

        self.draft = None;
        Ok(Some(saved))
    }

    pub async fn delete(&mut self, client: &ApiClient, id: &str) -> Result<(), ClientError> {
        client.delete_todo(id).await?;
        self.todos.retain(|t| t.id != id);
        self.total = self.total.saturating_sub(1);

        let last_page = u32::try_from(self.total.div_ceil(u64::from(self.limit)))
            .unwrap_or(u32::MAX)
            .max(1);
        self.load(client, self.page.min(last_page)).await;
        Ok(())
    }
}
