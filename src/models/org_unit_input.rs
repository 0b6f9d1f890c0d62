use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrgUnitInput {
    pub name: String,
    pub status: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrgUnitInput {
    pub name: Option<String>,
    pub status: Option<bool>,
}
