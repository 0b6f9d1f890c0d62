use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    extractors::AuthenticatedUser,
    models::{CreateNotificationInput, Notification, UpdateNotificationInput},
    pagination::{Paginated, Pagination},
    AppError, AppResult, AppState,
};

/// GET /api/notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(Pagination),
    responses((status = 200, description = "Notification page", body = Paginated<Notification>)),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paginated<Notification>>> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Notifications""#)
        .fetch_one(&state.db)
        .await?;

    let rows = sqlx::query_as::<_, Notification>(
        r#"SELECT * FROM "Notifications" ORDER BY id DESC LIMIT $1 OFFSET $2"#,
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Paginated::new(count, &pagination, rows)))
}

/// POST /api/notifications
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationInput,
    responses((status = 201, description = "Notification created", body = Notification)),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Json(input): Json<CreateNotificationInput>,
) -> AppResult<(StatusCode, Json<Notification>)> {
    let notification = sqlx::query_as::<_, Notification>(
        r#"INSERT INTO "Notifications" (title, message) VALUES ($1, $2) RETURNING *"#,
    )
    .bind(&input.title)
    .bind(input.message.as_deref().unwrap_or(""))
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

/// PUT /api/notifications/{id}
#[utoipa::path(
    put,
    path = "/api/notifications/{id}",
    params(("id" = i32, Path, description = "Notification ID")),
    request_body = UpdateNotificationInput,
    responses(
        (status = 200, description = "Notification updated", body = Notification),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn update_notification(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<i32>,
    _auth: AuthenticatedUser,
    Json(input): Json<UpdateNotificationInput>,
) -> AppResult<Json<Notification>> {
    let notification = sqlx::query_as::<_, Notification>(
        r#"
        UPDATE "Notifications"
        SET title = COALESCE($1, title),
            message = COALESCE($2, message),
            is_read = COALESCE($3, is_read)
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(&input.title)
    .bind(&input.message)
    .bind(input.is_read)
    .bind(notification_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", notification_id)))?;

    Ok(Json(notification))
}

/// DELETE /api/notifications/{id}
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<i32>,
    _auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM "Notifications" WHERE id = $1"#)
        .bind(notification_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Notification {} not found",
            notification_id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
