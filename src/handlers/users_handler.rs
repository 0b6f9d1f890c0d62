use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    auth,
    extractors::AuthenticatedUser,
    models::{CreateUserInput, UpdateUserInput, User},
    AppError, AppResult, AppState,
};

fn require_staff(auth: &AuthenticatedUser, action: &str) -> AppResult<()> {
    if auth.is_staff() {
        Ok(())
    } else {
        tracing::warn!(user_id = auth.id, action, "Non-admin attempted user mutation");
        Err(AppError::Forbidden(format!(
            "Only admins may {} users",
            action
        )))
    }
}

/// GET /api/users - everyone for admins, only yourself otherwise
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users visible to the caller", body = Vec<User>)
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    let users = if auth.is_staff() {
        sqlx::query_as::<_, User>(r#"SELECT * FROM "Users" ORDER BY id DESC"#)
            .fetch_all(&state.db)
            .await?
    } else {
        sqlx::query_as::<_, User>(r#"SELECT * FROM "Users" WHERE id = $1"#)
            .bind(auth.id)
            .fetch_all(&state.db)
            .await?
    };

    Ok(Json(users))
}

/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User missing or not visible")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    auth: AuthenticatedUser,
) -> AppResult<Json<User>> {
    if user_id != auth.id && !auth.is_staff() {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "Users" WHERE id = $1"#)
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    Ok(Json(user))
}

/// POST /api/users - Create a user account (admin only)
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Username already taken")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    require_staff(&auth, "create")?;

    if input.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".to_string()));
    }

    let password_hash = auth::hash_password(&input.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO "Users" (username, full_name, password_hash, is_superuser, is_admin, org_unit_id, station_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&input.username)
    .bind(&input.full_name)
    .bind(&password_hash)
    .bind(input.is_superuser.unwrap_or(false))
    .bind(input.is_admin.unwrap_or(false))
    .bind(input.org_unit_id)
    .bind(&input.station_name)
    .fetch_one(&state.db)
    .await
    .map_err(|e| AppError::from_insert(e, "username"))?;

    tracing::info!(user_id = user.id, created_by = auth.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{id} - Update a user account (admin only)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "No fields to update"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already taken")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    auth: AuthenticatedUser,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<User>> {
    require_staff(&auth, "update")?;

    let password_hash = match input.password.as_deref() {
        Some("") => return Err(AppError::Validation("Password must not be empty".to_string())),
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    // Build dynamic UPDATE query
    let mut updates = vec![];
    let mut bind_count = 1;

    if input.username.is_some() {
        updates.push(format!("username = ${}", bind_count));
        bind_count += 1;
    }
    if input.full_name.is_some() {
        updates.push(format!("full_name = ${}", bind_count));
        bind_count += 1;
    }
    if password_hash.is_some() {
        updates.push(format!("password_hash = ${}", bind_count));
        bind_count += 1;
    }
    if input.is_superuser.is_some() {
        updates.push(format!("is_superuser = ${}", bind_count));
        bind_count += 1;
    }
    if input.is_admin.is_some() {
        updates.push(format!("is_admin = ${}", bind_count));
        bind_count += 1;
    }
    if input.org_unit_id.is_some() {
        updates.push(format!("org_unit_id = ${}", bind_count));
        bind_count += 1;
    }
    if input.station_name.is_some() {
        updates.push(format!("station_name = ${}", bind_count));
        bind_count += 1;
    }

    if updates.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let sql = format!(
        r#"UPDATE "Users" SET {} WHERE id = ${}"#,
        updates.join(", "),
        bind_count
    );

    let mut query = sqlx::query(&sql);
    if let Some(username) = &input.username {
        query = query.bind(username);
    }
    if let Some(full_name) = &input.full_name {
        query = query.bind(full_name);
    }
    if let Some(password_hash) = &password_hash {
        query = query.bind(password_hash);
    }
    if let Some(is_superuser) = input.is_superuser {
        query = query.bind(is_superuser);
    }
    if let Some(is_admin) = input.is_admin {
        query = query.bind(is_admin);
    }
    if let Some(org_unit_id) = input.org_unit_id {
        query = query.bind(org_unit_id);
    }
    if let Some(station_name) = &input.station_name {
        query = query.bind(station_name);
    }
    query = query.bind(user_id);

    let result = query
        .execute(&state.db)
        .await
        .map_err(|e| AppError::from_insert(e, "username"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "Users" WHERE id = $1"#)
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(user_id, updated_by = auth.id, "User updated");
    Ok(Json(user))
}

/// DELETE /api/users/{id} (admin only)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User still referenced by requests or responses")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    require_staff(&auth, "delete")?;

    let result = sqlx::query(r#"DELETE FROM "Users" WHERE id = $1"#)
        .bind(user_id)
        .execute(&state.db)
        .await
        .map_err(|e| AppError::from_delete(e, "user"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    tracing::info!(user_id, deleted_by = auth.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
