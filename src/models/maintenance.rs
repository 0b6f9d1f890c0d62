use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceType {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MaintenanceTypeInput {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ObjectEntry {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ObjectEntryInput {
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceRecord {
    pub id: i32,
    pub object_id: Option<i32>,
    pub maintenance_type_id: Option<i32>,
    pub scheduled_for: Option<NaiveDate>,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMaintenanceRecordInput {
    pub object_id: Option<i32>,
    pub maintenance_type_id: Option<i32>,
    pub scheduled_for: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMaintenanceRecordInput {
    pub object_id: Option<i32>,
    pub maintenance_type_id: Option<i32>,
    pub scheduled_for: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}
