use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrgUnit {
    pub id: i32,
    pub name: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
}
