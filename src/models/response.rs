use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A response row joined with the author's username.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ResponseDetail {
    pub id: i32,
    pub request_id: i32,
    pub body: String,
    pub created_by: i32,
    pub created_by_username: String,
    pub is_approved: bool,
    pub submitted_at: DateTime<Utc>,
}
