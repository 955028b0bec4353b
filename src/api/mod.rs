pub mod dto;
mod todo;
mod user;

use std::time::Duration;

use axum::extract::{FromRequest, State};
use axum::http::{Method, StatusCode, header};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;
use dto::MessageResponse;

/// `axum::Json` whose rejections come back in the JSON error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .route("/getuser", get(user::get_user));

    let todo_routes = Router::new()
        .route("/add", post(todo::add_todo))
        .route("/get-all", get(todo::list_todos))
        .route("/update/{id}", put(todo::update_todo))
        .route("/delete/{id}", delete(todo::delete_todo));

    let api = Router::new()
        .nest("/user", user_routes)
        .nest("/todo", todo_routes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::ok("Hello Developer !"))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await?;
    Ok(StatusCode::OK)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
