use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    extractors::AuthenticatedUser,
    models::{CreateRequestInput, RequestDetail, RequestStatus, UpdateRequestInput},
    pagination::{Paginated, Pagination},
    AppError, AppResult, AppState,
};

pub(crate) const REQUEST_SELECT: &str = r#"
    SELECT
        r.id,
        r.title,
        r.body,
        r.org_unit_id,
        ou.name AS org_unit_name,
        r.sender_unit_id,
        su.name AS sender_unit_name,
        r.created_by,
        u.username AS created_by_username,
        r.status,
        r.is_approved,
        r.submitted_at
"#;

pub(crate) const REQUEST_FROM: &str = r#"
    FROM "Requests" r
    INNER JOIN "OrgUnits" ou ON r.org_unit_id = ou.id
    LEFT JOIN "OrgUnits" su ON r.sender_unit_id = su.id
    INNER JOIN "Users" u ON r.created_by = u.id
    WHERE 1=1
"#;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RequestsQuery {
    pub status: Option<String>,
    pub is_approved: Option<bool>,
    /// Receiving unit name, exact match.
    pub org_unit: Option<String>,
    /// Substring search across title, body, unit name and submitter.
    pub search: Option<String>,
    /// One of id, submitted_at, status; prefix with '-' for descending.
    pub ordering: Option<String>,
}

/// Append the shared filter set to a request query under assembly. Used by
/// both the submissions listing and the incoming view so the two can never
/// drift apart.
pub(crate) fn push_request_filters<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    query: &'a RequestsQuery,
) -> AppResult<()> {
    if let Some(raw) = query.status.as_deref() {
        let status = RequestStatus::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", raw)))?;
        qb.push(" AND r.status = ");
        qb.push_bind(status.as_str());
    }

    if let Some(is_approved) = query.is_approved {
        qb.push(" AND r.is_approved = ");
        qb.push_bind(is_approved);
    }

    if let Some(org_unit) = query.org_unit.as_deref() {
        qb.push(" AND ou.name = ");
        qb.push_bind(org_unit);
    }

    if let Some(search) = query.search.as_deref() {
        let pattern = format!("%{}%", search);
        qb.push(" AND (r.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR r.body ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR ou.name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR u.username ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    Ok(())
}

/// Whitelisted ordering; anything unrecognized falls back to newest-first.
pub(crate) fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("id") => " ORDER BY r.id",
        Some("submitted_at") => " ORDER BY r.submitted_at",
        Some("-submitted_at") => " ORDER BY r.submitted_at DESC",
        Some("status") => " ORDER BY r.status",
        Some("-status") => " ORDER BY r.status DESC",
        _ => " ORDER BY r.id DESC",
    }
}

pub(crate) async fn fetch_request_detail(
    db: &sqlx::PgPool,
    request_id: i32,
) -> AppResult<Option<RequestDetail>> {
    let sql = format!("{}{} AND r.id = $1", REQUEST_SELECT, REQUEST_FROM);
    let detail = sqlx::query_as::<_, RequestDetail>(&sql)
        .bind(request_id)
        .fetch_optional(db)
        .await?;
    Ok(detail)
}

async fn ensure_org_unit_exists(db: &sqlx::PgPool, unit_id: i32) -> AppResult<()> {
    let exists: Option<i32> = sqlx::query_scalar(r#"SELECT id FROM "OrgUnits" WHERE id = $1"#)
        .bind(unit_id)
        .fetch_optional(db)
        .await?;

    if exists.is_none() {
        return Err(AppError::Validation(format!("Unknown org unit: {}", unit_id)));
    }
    Ok(())
}

/// GET /api/requests - the caller's own submissions (everything for superusers)
#[utoipa::path(
    get,
    path = "/api/requests",
    params(RequestsQuery, Pagination),
    responses(
        (status = 200, description = "Requests visible to the caller", body = Paginated<RequestDetail>),
        (status = 422, description = "Unknown status filter")
    ),
    tag = "requests",
    security(("bearer_auth" = []))
)]
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Query(query): Query<RequestsQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paginated<RequestDetail>>> {
    let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {}", REQUEST_FROM));
    if !auth.is_superuser {
        count_qb.push(" AND r.created_by = ");
        count_qb.push_bind(auth.id);
    }
    push_request_filters(&mut count_qb, &query)?;

    let count: i64 = count_qb
        .build_query_scalar()
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.id, "Failed to count requests");
            e
        })?;

    let mut qb = QueryBuilder::new(format!("{}{}", REQUEST_SELECT, REQUEST_FROM));
    if !auth.is_superuser {
        qb.push(" AND r.created_by = ");
        qb.push_bind(auth.id);
    }
    push_request_filters(&mut qb, &query)?;
    qb.push(order_clause(query.ordering.as_deref()));
    qb.push(" LIMIT ");
    qb.push_bind(pagination.limit());
    qb.push(" OFFSET ");
    qb.push_bind(pagination.offset());

    let rows: Vec<RequestDetail> = qb
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.id, "Failed to list requests");
            e
        })?;

    Ok(Json(Paginated::new(count, &pagination, rows)))
}

/// GET /api/requests/{id}
#[utoipa::path(
    get,
    path = "/api/requests/{id}",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request found", body = RequestDetail),
        (status = 404, description = "Request missing or not visible")
    ),
    tag = "requests",
    security(("bearer_auth" = []))
)]
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i32>,
    auth: AuthenticatedUser,
) -> AppResult<Json<RequestDetail>> {
    let request = fetch_request_detail(&state.db, request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", request_id)))?;

    // Hidden records look exactly like missing ones.
    if !auth.is_superuser && request.created_by != auth.id {
        return Err(AppError::NotFound(format!("Request {} not found", request_id)));
    }

    Ok(Json(request))
}

/// POST /api/requests - Submit a new request
#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = CreateRequestInput,
    responses(
        (status = 201, description = "Request submitted", body = RequestDetail),
        (status = 422, description = "Unknown org unit")
    ),
    tag = "requests",
    security(("bearer_auth" = []))
)]
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<CreateRequestInput>,
) -> AppResult<(StatusCode, Json<RequestDetail>)> {
    ensure_org_unit_exists(&state.db, input.org_unit_id).await?;
    if let Some(sender_unit_id) = input.sender_unit_id {
        ensure_org_unit_exists(&state.db, sender_unit_id).await?;
    }

    // Status and approval are server-assigned; client-supplied values for
    // either are not part of the payload schema at all.
    let request_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO "Requests" (title, body, org_unit_id, sender_unit_id, created_by, status, is_approved)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&input.title)
    .bind(input.body.as_deref().unwrap_or(""))
    .bind(input.org_unit_id)
    .bind(input.sender_unit_id)
    .bind(auth.id)
    .bind(RequestStatus::InProgress.as_str())
    .bind(auth.is_superuser)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(request_id, user_id = auth.id, org_unit_id = input.org_unit_id, "Request submitted");

    let detail = fetch_request_detail(&state.db, request_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Request {} vanished after insert", request_id)))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /api/requests/{id} - Edit title/body/units; never status or approval
#[utoipa::path(
    put,
    path = "/api/requests/{id}",
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateRequestInput,
    responses(
        (status = 200, description = "Request updated", body = RequestDetail),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Request missing or not visible")
    ),
    tag = "requests",
    security(("bearer_auth" = []))
)]
pub async fn update_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i32>,
    auth: AuthenticatedUser,
    Json(input): Json<UpdateRequestInput>,
) -> AppResult<Json<RequestDetail>> {
    ensure_request_owner(&state.db, request_id, &auth).await?;

    if let Some(org_unit_id) = input.org_unit_id {
        ensure_org_unit_exists(&state.db, org_unit_id).await?;
    }
    if let Some(sender_unit_id) = input.sender_unit_id {
        ensure_org_unit_exists(&state.db, sender_unit_id).await?;
    }

    // Build dynamic UPDATE query
    let mut updates = vec![];
    let mut bind_count = 1;

    if input.title.is_some() {
        updates.push(format!("title = ${}", bind_count));
        bind_count += 1;
    }
    if input.body.is_some() {
        updates.push(format!("body = ${}", bind_count));
        bind_count += 1;
    }
    if input.org_unit_id.is_some() {
        updates.push(format!("org_unit_id = ${}", bind_count));
        bind_count += 1;
    }
    if input.sender_unit_id.is_some() {
        updates.push(format!("sender_unit_id = ${}", bind_count));
        bind_count += 1;
    }

    if updates.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let sql = format!(
        r#"UPDATE "Requests" SET {} WHERE id = ${}"#,
        updates.join(", "),
        bind_count
    );

    let mut query = sqlx::query(&sql);
    if let Some(title) = &input.title {
        query = query.bind(title);
    }
    if let Some(body) = &input.body {
        query = query.bind(body);
    }
    if let Some(org_unit_id) = input.org_unit_id {
        query = query.bind(org_unit_id);
    }
    if let Some(sender_unit_id) = input.sender_unit_id {
        query = query.bind(sender_unit_id);
    }
    query = query.bind(request_id);

    query.execute(&state.db).await?;

    let detail = fetch_request_detail(&state.db, request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", request_id)))?;

    Ok(Json(detail))
}

/// DELETE /api/requests/{id}
#[utoipa::path(
    delete,
    path = "/api/requests/{id}",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 404, description = "Request missing or not visible")
    ),
    tag = "requests",
    security(("bearer_auth" = []))
)]
pub async fn delete_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i32>,
    auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    ensure_request_owner(&state.db, request_id, &auth).await?;

    sqlx::query(r#"DELETE FROM "Requests" WHERE id = $1"#)
        .bind(request_id)
        .execute(&state.db)
        .await?;

    tracing::info!(request_id, user_id = auth.id, "Request deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Mutations are reserved to the submitter and superusers; everyone else
/// gets the same 404 a nonexistent id would produce.
async fn ensure_request_owner(
    db: &sqlx::PgPool,
    request_id: i32,
    auth: &AuthenticatedUser,
) -> AppResult<()> {
    let created_by: Option<i32> =
        sqlx::query_scalar(r#"SELECT created_by FROM "Requests" WHERE id = $1"#)
            .bind(request_id)
            .fetch_optional(db)
            .await?;

    match created_by {
        Some(owner) if auth.is_superuser || owner == auth.id => Ok(()),
        _ => Err(AppError::NotFound(format!("Request {} not found", request_id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_whitelist() {
        assert_eq!(order_clause(Some("id")), " ORDER BY r.id");
        assert_eq!(order_clause(Some("-submitted_at")), " ORDER BY r.submitted_at DESC");
        assert_eq!(order_clause(Some("status")), " ORDER BY r.status");
        assert_eq!(order_clause(None), " ORDER BY r.id DESC");
        assert_eq!(order_clause(Some("created_by; DROP TABLE")), " ORDER BY r.id DESC");
    }

    #[test]
    fn test_push_request_filters_binds_in_order() {
        let query = RequestsQuery {
            status: Some("in_progress".to_string()),
            is_approved: Some(true),
            org_unit: Some("Signals".to_string()),
            search: Some("relay".to_string()),
            ordering: None,
        };

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM x WHERE 1=1");
        push_request_filters(&mut qb, &query).unwrap();
        let sql = qb.into_sql();

        assert!(sql.contains("r.status = $1"));
        assert!(sql.contains("r.is_approved = $2"));
        assert!(sql.contains("ou.name = $3"));
        assert!(sql.contains("r.title ILIKE $4"));
        assert!(sql.contains("u.username ILIKE $7"));
    }

    #[test]
    fn test_push_request_filters_rejects_bad_status() {
        let query = RequestsQuery {
            status: Some("finished".to_string()),
            ..Default::default()
        };

        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE 1=1");
        assert!(push_request_filters(&mut qb, &query).is_err());
    }
}
