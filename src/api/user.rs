use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use super::ApiJson;
use super::dto::{AuthResponse, UserResponse};
use crate::auth::{AuthUser, Claims};
use crate::error::AppError;
use crate::models::{LoginRequest, NewUser, PublicUser, RegisterRequest};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let registration = req
        .into_registration()
        .ok_or_else(|| AppError::BadRequest("All fields are required".to_string()))?;

    if state.store.find_user_by_email(&registration.email).await?.is_some() {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let auth = state.auth.clone();
    let password = registration.password;
    let password_hash = tokio::task::spawn_blocking(move || auth.hash_password(&password)).await??;

    let user = state
        .store
        .insert_user(NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
        })
        .await?;
    info!("registered user {}", user.id);

    let token = state
        .auth
        .issue_session(Claims::for_user(&user.id).with_email(&user.email))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let credentials = req
        .into_credentials()
        .ok_or_else(|| AppError::BadRequest("Email and password are required".to_string()))?;

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = state
        .store
        .find_user_by_email(&credentials.email)
        .await?
        .ok_or_else(invalid)?;

    let auth = state.auth.clone();
    let hash = user.password_hash.clone();
    let password = credentials.password;
    let matches =
        tokio::task::spawn_blocking(move || auth.verify_password(&password, &hash)).await?;
    if !matches {
        return Err(invalid());
    }

    let token = state.auth.issue_session(Claims::for_user(&user.id))?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: PublicUser::from(&user),
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .store
        .find_user_by_id(&caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        success: true,
        user: PublicUser::from(&user),
    }))
}
