use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    extractors::AuthenticatedUser,
    models::{CreateOrgUnitInput, OrgUnit, UpdateOrgUnitInput},
    visibility, AppError, AppResult, AppState,
};

// The active-unit listing is read on every station resolution screen;
// cache it briefly.
static ORG_UNITS_CACHE: Lazy<Cache<&'static str, Vec<OrgUnit>>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60))
        .build()
});

async fn invalidate_caches() {
    ORG_UNITS_CACHE.invalidate(&"active").await;
    // Renames and deletions change what station names resolve to.
    visibility::invalidate_station_cache();
}

/// GET /api/org-units - active units only
#[utoipa::path(
    get,
    path = "/api/org-units",
    responses(
        (status = 200, description = "Active org units", body = Vec<OrgUnit>)
    ),
    tag = "org-units"
)]
pub async fn list_org_units(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<OrgUnit>>> {
    if let Some(cached) = ORG_UNITS_CACHE.get(&"active").await {
        return Ok(Json(cached));
    }

    let units = sqlx::query_as::<_, OrgUnit>(
        r#"SELECT * FROM "OrgUnits" WHERE status = true ORDER BY name"#,
    )
    .fetch_all(&state.db)
    .await?;

    ORG_UNITS_CACHE.insert("active", units.clone()).await;
    Ok(Json(units))
}

/// POST /api/org-units - Create an org unit
#[utoipa::path(
    post,
    path = "/api/org-units",
    request_body = CreateOrgUnitInput,
    responses(
        (status = 201, description = "Org unit created", body = OrgUnit),
        (status = 409, description = "Name already taken")
    ),
    tag = "org-units",
    security(("bearer_auth" = []))
)]
pub async fn create_org_unit(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<CreateOrgUnitInput>,
) -> AppResult<(StatusCode, Json<OrgUnit>)> {
    let unit = sqlx::query_as::<_, OrgUnit>(
        r#"
        INSERT INTO "OrgUnits" (name, status)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(input.status.unwrap_or(true))
    .fetch_one(&state.db)
    .await
    .map_err(|e| AppError::from_insert(e, "org unit"))?;

    invalidate_caches().await;
    tracing::info!(org_unit_id = unit.id, created_by = auth.id, "Org unit created");
    Ok((StatusCode::CREATED, Json(unit)))
}

/// PUT /api/org-units/{id} - Update an org unit
#[utoipa::path(
    put,
    path = "/api/org-units/{id}",
    params(("id" = i32, Path, description = "Org unit ID")),
    request_body = UpdateOrgUnitInput,
    responses(
        (status = 200, description = "Org unit updated", body = OrgUnit),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Org unit not found"),
        (status = 409, description = "Name already taken")
    ),
    tag = "org-units",
    security(("bearer_auth" = []))
)]
pub async fn update_org_unit(
    State(state): State<Arc<AppState>>,
    Path(unit_id): Path<i32>,
    auth: AuthenticatedUser,
    Json(input): Json<UpdateOrgUnitInput>,
) -> AppResult<Json<OrgUnit>> {
    // Build dynamic UPDATE query
    let mut updates = vec![];
    let mut bind_count = 1;

    if input.name.is_some() {
        updates.push(format!("name = ${}", bind_count));
        bind_count += 1;
    }
    if input.status.is_some() {
        updates.push(format!("status = ${}", bind_count));
        bind_count += 1;
    }

    if updates.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let sql = format!(
        r#"UPDATE "OrgUnits" SET {} WHERE id = ${}"#,
        updates.join(", "),
        bind_count
    );

    let mut query = sqlx::query(&sql);
    if let Some(name) = &input.name {
        query = query.bind(name);
    }
    if let Some(status) = input.status {
        query = query.bind(status);
    }
    query = query.bind(unit_id);

    let result = query
        .execute(&state.db)
        .await
        .map_err(|e| AppError::from_insert(e, "org unit"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Org unit {} not found", unit_id)));
    }

    let unit = sqlx::query_as::<_, OrgUnit>(r#"SELECT * FROM "OrgUnits" WHERE id = $1"#)
        .bind(unit_id)
        .fetch_one(&state.db)
        .await?;

    invalidate_caches().await;
    tracing::info!(org_unit_id = unit_id, updated_by = auth.id, "Org unit updated");
    Ok(Json(unit))
}

/// DELETE /api/org-units/{id}
#[utoipa::path(
    delete,
    path = "/api/org-units/{id}",
    params(("id" = i32, Path, description = "Org unit ID")),
    responses(
        (status = 204, description = "Org unit deleted"),
        (status = 404, description = "Org unit not found"),
        (status = 409, description = "Org unit still referenced by requests")
    ),
    tag = "org-units",
    security(("bearer_auth" = []))
)]
pub async fn delete_org_unit(
    State(state): State<Arc<AppState>>,
    Path(unit_id): Path<i32>,
    auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM "OrgUnits" WHERE id = $1"#)
        .bind(unit_id)
        .execute(&state.db)
        .await
        .map_err(|e| AppError::from_delete(e, "org unit"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Org unit {} not found", unit_id)));
    }

    invalidate_caches().await;
    tracing::info!(org_unit_id = unit_id, deleted_by = auth.id, "Org unit deleted");
    Ok(StatusCode::NO_CONTENT)
}
