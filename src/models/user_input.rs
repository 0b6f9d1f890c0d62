use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_superuser: Option<bool>,
    pub is_admin: Option<bool>,
    pub org_unit_id: Option<i32>,
    pub station_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub is_superuser: Option<bool>,
    pub is_admin: Option<bool>,
    pub org_unit_id: Option<i32>,
    pub station_name: Option<String>,
}
