use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::debug;

use super::ApiJson;
use super::dto::{MessageResponse, TodoListResponse, TodoResponse};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{NewTodoRequest, UpdateTodoRequest};
use crate::pagination::{PageQuery, Pagination};
use crate::state::AppState;

fn todo_not_found() -> AppError {
    AppError::NotFound("Todo not found".to_string())
}

pub async fn add_todo(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(req): ApiJson<NewTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    let new_todo = req.validate()?;
    let todo = state.store.insert_todo(&caller.id, new_todo).await?;
    debug!("user {} created todo {}", caller.id, todo.id);

    Ok((
        StatusCode::CREATED,
        Json(TodoResponse {
            success: true,
            message: "Todo created successfully".to_string(),
            todo,
        }),
    ))
}

pub async fn list_todos(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<TodoListResponse>, AppError> {
    let pagination = Pagination::from_query(&query);
    let page = state
        .store
        .list_todos(state.todo_scope(&caller), pagination)
        .await?;
    Ok(Json(page.into()))
}

pub async fn update_todo(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, AppError> {
    let scope = state.todo_scope(&caller);
    // Unknown ids answer 404 even when the body is also invalid.
    if state.store.find_todo(&id, scope).await?.is_none() {
        return Err(todo_not_found());
    }

    let changes = req.validate()?;
    let todo = state
        .store
        .update_todo(&id, scope, changes)
        .await?
        .ok_or_else(todo_not_found)?;

    Ok(Json(TodoResponse {
        success: true,
        message: "Todo updated successfully".to_string(),
        todo,
    }))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = state
        .store
        .delete_todo(&id, state.todo_scope(&caller))
        .await?;
    if !deleted {
        return Err(todo_not_found());
    }

    Ok(Json(MessageResponse::ok("Todo deleted successfully")))
}
