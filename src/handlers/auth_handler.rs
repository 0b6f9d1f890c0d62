use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{auth, extractors::AuthenticatedUser, models::User, AppError, AppResult, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // Unknown user and wrong password produce the same answer.
    let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

    let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "Users" WHERE username = $1"#)
        .bind(&payload.username)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    let token = auth::issue_token(
        user.id,
        &user.username,
        &state.config.jwt_secret,
        state.config.token_expiry_minutes,
    )?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse { token, user }))
}

/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current authenticated user", body = User),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "Users" WHERE id = $1"#)
        .bind(auth.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(user))
}
