use axum::{
    extract::{Query, State},
    Json,
};
use sqlx::QueryBuilder;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    extractors::AuthenticatedUser,
    models::{RequestDetail, RequestWithResponses, ResponseDetail},
    pagination::{Paginated, Pagination},
    visibility::Visibility,
    AppResult, AppState,
};

use super::requests_handler::{
    order_clause, push_request_filters, RequestsQuery, REQUEST_FROM, REQUEST_SELECT,
};

const RESPONSES_FOR_REQUESTS: &str = r#"
    SELECT
        resp.id,
        resp.request_id,
        resp.body,
        resp.created_by,
        u.username AS created_by_username,
        resp.is_approved,
        resp.submitted_at
    FROM "Responses" resp
    INNER JOIN "Users" u ON resp.created_by = u.id
    WHERE resp.request_id = ANY($1)
    ORDER BY resp.id
"#;

/// GET /api/incoming-requests - requests addressed to the caller's unit,
/// with their responses attached. Read-only.
#[utoipa::path(
    get,
    path = "/api/incoming-requests",
    params(RequestsQuery, Pagination),
    responses(
        (status = 200, description = "Requests visible to the caller's unit, with nested responses", body = Paginated<RequestWithResponses>),
        (status = 422, description = "Unknown status filter")
    ),
    tag = "incoming-requests",
    security(("bearer_auth" = []))
)]
pub async fn list_incoming_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Query(query): Query<RequestsQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paginated<RequestWithResponses>>> {
    let visibility = Visibility::resolve(&state.db, &auth).await?;

    let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {}", REQUEST_FROM));
    visibility.push_predicate(&mut count_qb, "r.org_unit_id");
    push_request_filters(&mut count_qb, &query)?;

    let count: i64 = count_qb
        .build_query_scalar()
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.id, "Failed to count incoming requests");
            e
        })?;

    let mut qb = QueryBuilder::new(format!("{}{}", REQUEST_SELECT, REQUEST_FROM));
    visibility.push_predicate(&mut qb, "r.org_unit_id");
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
            tracing::error!(error = %e, user_id = auth.id, "Failed to list incoming requests");
            e
        })?;

    // Attach responses in one pass instead of a query per request.
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let mut grouped: HashMap<i32, Vec<ResponseDetail>> = HashMap::new();

    if !ids.is_empty() {
        let responses = sqlx::query_as::<_, ResponseDetail>(RESPONSES_FOR_REQUESTS)
            .bind(&ids)
            .fetch_all(&state.db)
            .await?;

        for response in responses {
            grouped.entry(response.request_id).or_default().push(response);
        }
    }

    let results = rows
        .into_iter()
        .map(|request| RequestWithResponses {
            responses: grouped.remove(&request.id).unwrap_or_default(),
            request,
        })
        .collect();

    Ok(Json(Paginated::new(count, &pagination, results)))
}
