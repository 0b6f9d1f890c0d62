use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    extractors::AuthenticatedUser,
    models::{CreateDocumentInput, Document, UpdateDocumentInput},
    pagination::{Paginated, Pagination},
    AppError, AppResult, AppState,
};

/// GET /api/documents
#[utoipa::path(
    get,
    path = "/api/documents",
    params(Pagination),
    responses((status = 200, description = "Document page", body = Paginated<Document>)),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paginated<Document>>> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Documents""#)
        .fetch_one(&state.db)
        .await?;

    let rows = sqlx::query_as::<_, Document>(
        r#"SELECT * FROM "Documents" ORDER BY id DESC LIMIT $1 OFFSET $2"#,
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Paginated::new(count, &pagination, rows)))
}

/// POST /api/documents
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentInput,
    responses((status = 201, description = "Document created", body = Document)),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Json(input): Json<CreateDocumentInput>,
) -> AppResult<(StatusCode, Json<Document>)> {
    let document = sqlx::query_as::<_, Document>(
        r#"INSERT INTO "Documents" (title, file_url) VALUES ($1, $2) RETURNING *"#,
    )
    .bind(&input.title)
    .bind(&input.file_url)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// PUT /api/documents/{id}
#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(("id" = i32, Path, description = "Document ID")),
    request_body = UpdateDocumentInput,
    responses(
        (status = 200, description = "Document updated", body = Document),
        (status = 404, description = "Document not found")
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<i32>,
    _auth: AuthenticatedUser,
    Json(input): Json<UpdateDocumentInput>,
) -> AppResult<Json<Document>> {
    let document = sqlx::query_as::<_, Document>(
        r#"
        UPDATE "Documents"
        SET title = COALESCE($1, title),
            file_url = COALESCE($2, file_url)
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(&input.title)
    .bind(&input.file_url)
    .bind(document_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Document {} not found", document_id)))?;

    Ok(Json(document))
}

/// DELETE /api/documents/{id}
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found")
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<i32>,
    _auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM "Documents" WHERE id = $1"#)
        .bind(document_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Document {} not found",
            document_id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
