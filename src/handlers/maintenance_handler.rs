use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    extractors::AuthenticatedUser,
    models::{
        CreateMaintenanceRecordInput, MaintenanceRecord, MaintenanceType, MaintenanceTypeInput,
        ObjectEntry, ObjectEntryInput, UpdateMaintenanceRecordInput,
    },
    pagination::{Paginated, Pagination},
    AppError, AppResult, AppState,
};

// Maintenance types

/// GET /api/maintenance-types
#[utoipa::path(
    get,
    path = "/api/maintenance-types",
    responses((status = 200, description = "All maintenance types", body = Vec<MaintenanceType>)),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn list_maintenance_types(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<MaintenanceType>>> {
    let types =
        sqlx::query_as::<_, MaintenanceType>(r#"SELECT * FROM "MaintenanceTypes" ORDER BY id"#)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(types))
}

/// POST /api/maintenance-types
#[utoipa::path(
    post,
    path = "/api/maintenance-types",
    request_body = MaintenanceTypeInput,
    responses((status = 201, description = "Maintenance type created", body = MaintenanceType)),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn create_maintenance_type(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Json(input): Json<MaintenanceTypeInput>,
) -> AppResult<(StatusCode, Json<MaintenanceType>)> {
    let record = sqlx::query_as::<_, MaintenanceType>(
        r#"INSERT INTO "MaintenanceTypes" (name) VALUES ($1) RETURNING *"#,
    )
    .bind(&input.name)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/maintenance-types/{id}
#[utoipa::path(
    put,
    path = "/api/maintenance-types/{id}",
    params(("id" = i32, Path, description = "Maintenance type ID")),
    request_body = MaintenanceTypeInput,
    responses(
        (status = 200, description = "Maintenance type updated", body = MaintenanceType),
        (status = 404, description = "Maintenance type not found")
    ),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn update_maintenance_type(
    State(state): State<Arc<AppState>>,
    Path(type_id): Path<i32>,
    _auth: AuthenticatedUser,
    Json(input): Json<MaintenanceTypeInput>,
) -> AppResult<Json<MaintenanceType>> {
    let record = sqlx::query_as::<_, MaintenanceType>(
        r#"UPDATE "MaintenanceTypes" SET name = $1 WHERE id = $2 RETURNING *"#,
    )
    .bind(&input.name)
    .bind(type_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Maintenance type {} not found", type_id)))?;

    Ok(Json(record))
}

/// DELETE /api/maintenance-types/{id}
#[utoipa::path(
    delete,
    path = "/api/maintenance-types/{id}",
    params(("id" = i32, Path, description = "Maintenance type ID")),
    responses(
        (status = 204, description = "Maintenance type deleted"),
        (status = 404, description = "Maintenance type not found")
    ),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn delete_maintenance_type(
    State(state): State<Arc<AppState>>,
    Path(type_id): Path<i32>,
    _auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM "MaintenanceTypes" WHERE id = $1"#)
        .bind(type_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Maintenance type {} not found",
            type_id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

// Object catalog

/// GET /api/objects
#[utoipa::path(
    get,
    path = "/api/objects",
    params(Pagination),
    responses((status = 200, description = "Object catalog page", body = Paginated<ObjectEntry>)),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn list_objects(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paginated<ObjectEntry>>> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Objects""#)
        .fetch_one(&state.db)
        .await?;

    let rows = sqlx::query_as::<_, ObjectEntry>(
        r#"SELECT * FROM "Objects" ORDER BY id LIMIT $1 OFFSET $2"#,
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Paginated::new(count, &pagination, rows)))
}

/// POST /api/objects
#[utoipa::path(
    post,
    path = "/api/objects",
    request_body = ObjectEntryInput,
    responses((status = 201, description = "Object created", body = ObjectEntry)),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn create_object(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Json(input): Json<ObjectEntryInput>,
) -> AppResult<(StatusCode, Json<ObjectEntry>)> {
    let record = sqlx::query_as::<_, ObjectEntry>(
        r#"INSERT INTO "Objects" (name, location) VALUES ($1, $2) RETURNING *"#,
    )
    .bind(&input.name)
    .bind(&input.location)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/objects/{id}
#[utoipa::path(
    put,
    path = "/api/objects/{id}",
    params(("id" = i32, Path, description = "Object ID")),
    request_body = ObjectEntryInput,
    responses(
        (status = 200, description = "Object updated", body = ObjectEntry),
        (status = 404, description = "Object not found")
    ),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn update_object(
    State(state): State<Arc<AppState>>,
    Path(object_id): Path<i32>,
    _auth: AuthenticatedUser,
    Json(input): Json<ObjectEntryInput>,
) -> AppResult<Json<ObjectEntry>> {
    let record = sqlx::query_as::<_, ObjectEntry>(
        r#"UPDATE "Objects" SET name = $1, location = $2 WHERE id = $3 RETURNING *"#,
    )
    .bind(&input.name)
    .bind(&input.location)
    .bind(object_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Object {} not found", object_id)))?;

    Ok(Json(record))
}

/// DELETE /api/objects/{id}
#[utoipa::path(
    delete,
    path = "/api/objects/{id}",
    params(("id" = i32, Path, description = "Object ID")),
    responses(
        (status = 204, description = "Object deleted"),
        (status = 404, description = "Object not found")
    ),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn delete_object(
    State(state): State<Arc<AppState>>,
    Path(object_id): Path<i32>,
    _auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM "Objects" WHERE id = $1"#)
        .bind(object_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Object {} not found", object_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// Maintenance schedule records

/// GET /api/maintenance-records
#[utoipa::path(
    get,
    path = "/api/maintenance-records",
    params(Pagination),
    responses((status = 200, description = "Maintenance record page", body = Paginated<MaintenanceRecord>)),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn list_maintenance_records(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paginated<MaintenanceRecord>>> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "MaintenanceRecords""#)
        .fetch_one(&state.db)
        .await?;

    let rows = sqlx::query_as::<_, MaintenanceRecord>(
        r#"SELECT * FROM "MaintenanceRecords" ORDER BY id DESC LIMIT $1 OFFSET $2"#,
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Paginated::new(count, &pagination, rows)))
}

/// POST /api/maintenance-records
#[utoipa::path(
    post,
    path = "/api/maintenance-records",
    request_body = CreateMaintenanceRecordInput,
    responses((status = 201, description = "Maintenance record created", body = MaintenanceRecord)),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn create_maintenance_record(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Json(input): Json<CreateMaintenanceRecordInput>,
) -> AppResult<(StatusCode, Json<MaintenanceRecord>)> {
    let record = sqlx::query_as::<_, MaintenanceRecord>(
        r#"
        INSERT INTO "MaintenanceRecords" (object_id, maintenance_type_id, scheduled_for, completed, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(input.object_id)
    .bind(input.maintenance_type_id)
    .bind(input.scheduled_for)
    .bind(input.completed.unwrap_or(false))
    .bind(&input.notes)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/maintenance-records/{id}
#[utoipa::path(
    put,
    path = "/api/maintenance-records/{id}",
    params(("id" = i32, Path, description = "Maintenance record ID")),
    request_body = UpdateMaintenanceRecordInput,
    responses(
        (status = 200, description = "Maintenance record updated", body = MaintenanceRecord),
        (status = 404, description = "Maintenance record not found")
    ),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn update_maintenance_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<i32>,
    _auth: AuthenticatedUser,
    Json(input): Json<UpdateMaintenanceRecordInput>,
) -> AppResult<Json<MaintenanceRecord>> {
    let record = sqlx::query_as::<_, MaintenanceRecord>(
        r#"
        UPDATE "MaintenanceRecords"
        SET object_id = COALESCE($1, object_id),
            maintenance_type_id = COALESCE($2, maintenance_type_id),
            scheduled_for = COALESCE($3, scheduled_for),
            completed = COALESCE($4, completed),
            notes = COALESCE($5, notes)
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(input.object_id)
    .bind(input.maintenance_type_id)
    .bind(input.scheduled_for)
    .bind(input.completed)
    .bind(&input.notes)
    .bind(record_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", record_id)))?;

    Ok(Json(record))
}

/// DELETE /api/maintenance-records/{id}
#[utoipa::path(
    delete,
    path = "/api/maintenance-records/{id}",
    params(("id" = i32, Path, description = "Maintenance record ID")),
    responses(
        (status = 204, description = "Maintenance record deleted"),
        (status = 404, description = "Maintenance record not found")
    ),
    tag = "maintenance",
    security(("bearer_auth" = []))
)]
pub async fn delete_maintenance_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<i32>,
    _auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM "MaintenanceRecords" WHERE id = $1"#)
        .bind(record_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Maintenance record {} not found",
            record_id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
