use serde::Deserialize;
use utoipa::ToSchema;

/// Client payload for a new request. `status` and `is_approved` are
/// server-assigned and deliberately absent here.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequestInput {
    pub title: String,
    pub body: Option<String>,
    pub org_unit_id: i32,
    pub sender_unit_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub org_unit_id: Option<i32>,
    pub sender_unit_id: Option<i32>,
}
