use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::QueryBuilder;
use std::sync::Arc;

use crate::{
    extractors::AuthenticatedUser,
    models::{CreateResponseInput, RequestDetail, RequestStatus, ResponseDetail, UpdateResponseInput},
    pagination::{Paginated, Pagination},
    visibility::Visibility,
    AppError, AppResult, AppState,
};

use super::requests_handler::{REQUEST_FROM, REQUEST_SELECT};

const RESPONSE_SELECT_FROM: &str = r#"
    SELECT
        resp.id,
        resp.request_id,
        resp.body,
        resp.created_by,
        u.username AS created_by_username,
        resp.is_approved,
        resp.submitted_at
    FROM "Responses" resp
    INNER JOIN "Requests" r ON resp.request_id = r.id
    INNER JOIN "Users" u ON resp.created_by = u.id
    WHERE 1=1
"#;

async fn fetch_response_detail(db: &sqlx::PgPool, response_id: i32) -> AppResult<ResponseDetail> {
    let sql = format!("{} AND resp.id = $1", RESPONSE_SELECT_FROM);
    let detail = sqlx::query_as::<_, ResponseDetail>(&sql)
        .bind(response_id)
        .fetch_one(db)
        .await?;
    Ok(detail)
}

/// GET /api/responses - responses scoped through the parent request's unit
#[utoipa::path(
    get,
    path = "/api/responses",
    params(Pagination),
    responses(
        (status = 200, description = "Responses visible to the caller", body = Paginated<ResponseDetail>)
    ),
    tag = "responses",
    security(("bearer_auth" = []))
)]
pub async fn list_responses(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paginated<ResponseDetail>>> {
    let visibility = Visibility::resolve(&state.db, &auth).await?;

    let mut count_qb = QueryBuilder::new(
        r#"SELECT COUNT(*) FROM "Responses" resp INNER JOIN "Requests" r ON resp.request_id = r.id WHERE 1=1"#,
    );
    // Scoping traverses the parent request, not the response's own fields.
    visibility.push_predicate(&mut count_qb, "r.org_unit_id");

    let count: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    let mut qb = QueryBuilder::new(RESPONSE_SELECT_FROM);
    visibility.push_predicate(&mut qb, "r.org_unit_id");
    qb.push(" ORDER BY resp.id DESC");
    qb.push(" LIMIT ");
    qb.push_bind(pagination.limit());
    qb.push(" OFFSET ");
    qb.push_bind(pagination.offset());

    let rows: Vec<ResponseDetail> = qb
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.id, "Failed to list responses");
            e
        })?;

    Ok(Json(Paginated::new(count, &pagination, rows)))
}

/// GET /api/responses/candidates - requests still selectable as a parent
#[utoipa::path(
    get,
    path = "/api/responses/candidates",
    responses(
        (status = 200, description = "In-progress requests visible to the caller", body = Vec<RequestDetail>)
    ),
    tag = "responses",
    security(("bearer_auth" = []))
)]
pub async fn list_candidate_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<RequestDetail>>> {
    let visibility = Visibility::resolve(&state.db, &auth).await?;

    let mut qb = QueryBuilder::new(format!("{}{}", REQUEST_SELECT, REQUEST_FROM));
    qb.push(" AND r.status = ");
    qb.push_bind(RequestStatus::InProgress.as_str());
    visibility.push_predicate(&mut qb, "r.org_unit_id");
    qb.push(" ORDER BY r.id DESC");

    let rows: Vec<RequestDetail> = qb.build_query_as().fetch_all(&state.db).await?;
    Ok(Json(rows))
}

/// POST /api/responses - answer a request, closing it
#[utoipa::path(
    post,
    path = "/api/responses",
    request_body = CreateResponseInput,
    responses(
        (status = 201, description = "Response created, parent request closed", body = ResponseDetail),
        (status = 404, description = "Parent request missing or not visible"),
        (status = 409, description = "Parent request already answered")
    ),
    tag = "responses",
    security(("bearer_auth" = []))
)]
pub async fn create_response(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<CreateResponseInput>,
) -> AppResult<(StatusCode, Json<ResponseDetail>)> {
    let visibility = Visibility::resolve(&state.db, &auth).await?;

    let mut tx = state.db.begin().await?;

    let parent: Option<(i32, String)> =
        sqlx::query_as(r#"SELECT org_unit_id, status FROM "Requests" WHERE id = $1 FOR UPDATE"#)
            .bind(input.request_id)
            .fetch_optional(&mut *tx)
            .await?;

    let (org_unit_id, raw_status) = parent
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", input.request_id)))?;

    // A request outside the caller's scope is indistinguishable from one
    // that does not exist.
    if !visibility.allows(org_unit_id) {
        return Err(AppError::NotFound(format!(
            "Request {} not found",
            input.request_id
        )));
    }

    let current = RequestStatus::parse(&raw_status).ok_or_else(|| {
        AppError::Internal(format!(
            "Request {} has unrecognized status '{}'",
            input.request_id, raw_status
        ))
    })?;

    if !current.can_close() {
        return Err(AppError::Conflict(format!(
            "Request {} is already {}",
            input.request_id, current
        )));
    }

    // Compare-and-set on the status column: the row lock above serializes
    // racers, and the guard makes the loser observe zero rows and roll
    // back instead of attaching a second response.
    let flipped = sqlx::query(r#"UPDATE "Requests" SET status = $1 WHERE id = $2 AND status = $3"#)
        .bind(RequestStatus::Done.as_str())
        .bind(input.request_id)
        .bind(RequestStatus::InProgress.as_str())
        .execute(&mut *tx)
        .await?;

    if flipped.rows_affected() == 0 {
        return Err(AppError::Conflict(format!(
            "Request {} was answered concurrently",
            input.request_id
        )));
    }

    let response_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO "Responses" (request_id, body, created_by, is_approved)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(input.request_id)
    .bind(input.body.as_deref().unwrap_or(""))
    .bind(auth.id)
    .bind(auth.is_superuser)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        response_id,
        request_id = input.request_id,
        user_id = auth.id,
        "Request answered and closed"
    );

    let detail = fetch_response_detail(&state.db, response_id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/responses/{id}
#[utoipa::path(
    get,
    path = "/api/responses/{id}",
    params(("id" = i32, Path, description = "Response ID")),
    responses(
        (status = 200, description = "Response found", body = ResponseDetail),
        (status = 404, description = "Response missing or not visible")
    ),
    tag = "responses",
    security(("bearer_auth" = []))
)]
pub async fn get_response(
    State(state): State<Arc<AppState>>,
    Path(response_id): Path<i32>,
    auth: AuthenticatedUser,
) -> AppResult<Json<ResponseDetail>> {
    let visibility = Visibility::resolve(&state.db, &auth).await?;

    let org_unit_id: Option<i32> = sqlx::query_scalar(
        r#"
        SELECT r.org_unit_id
        FROM "Responses" resp
        INNER JOIN "Requests" r ON resp.request_id = r.id
        WHERE resp.id = $1
        "#,
    )
    .bind(response_id)
    .fetch_optional(&state.db)
    .await?;

    match org_unit_id {
        Some(unit_id) if visibility.allows(unit_id) => {
            let detail = fetch_response_detail(&state.db, response_id).await?;
            Ok(Json(detail))
        }
        _ => Err(AppError::NotFound(format!(
            "Response {} not found",
            response_id
        ))),
    }
}

/// PUT /api/responses/{id} - edit the body text only
#[utoipa::path(
    put,
    path = "/api/responses/{id}",
    params(("id" = i32, Path, description = "Response ID")),
    request_body = UpdateResponseInput,
    responses(
        (status = 200, description = "Response updated", body = ResponseDetail),
        (status = 404, description = "Response missing or not visible")
    ),
    tag = "responses",
    security(("bearer_auth" = []))
)]
pub async fn update_response(
    State(state): State<Arc<AppState>>,
    Path(response_id): Path<i32>,
    auth: AuthenticatedUser,
    Json(input): Json<UpdateResponseInput>,
) -> AppResult<Json<ResponseDetail>> {
    ensure_response_owner(&state.db, response_id, &auth).await?;

    sqlx::query(r#"UPDATE "Responses" SET body = $1 WHERE id = $2"#)
        .bind(&input.body)
        .bind(response_id)
        .execute(&state.db)
        .await?;

    let detail = fetch_response_detail(&state.db, response_id).await?;
    Ok(Json(detail))
}

/// DELETE /api/responses/{id}
#[utoipa::path(
    delete,
    path = "/api/responses/{id}",
    params(("id" = i32, Path, description = "Response ID")),
    responses(
        (status = 204, description = "Response deleted"),
        (status = 404, description = "Response missing or not visible")
    ),
    tag = "responses",
    security(("bearer_auth" = []))
)]
pub async fn delete_response(
    State(state): State<Arc<AppState>>,
    Path(response_id): Path<i32>,
    auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    ensure_response_owner(&state.db, response_id, &auth).await?;

    sqlx::query(r#"DELETE FROM "Responses" WHERE id = $1"#)
        .bind(response_id)
        .execute(&state.db)
        .await?;

    tracing::info!(response_id, user_id = auth.id, "Response deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_response_owner(
    db: &sqlx::PgPool,
    response_id: i32,
    auth: &AuthenticatedUser,
) -> AppResult<()> {
    let created_by: Option<i32> =
        sqlx::query_scalar(r#"SELECT created_by FROM "Responses" WHERE id = $1"#)
            .bind(response_id)
            .fetch_optional(db)
            .await?;

    match created_by {
        Some(owner) if auth.is_superuser || owner == auth.id => Ok(()),
        _ => Err(AppError::NotFound(format!(
            "Response {} not found",
            response_id
        ))),
    }
}
