use serde::Deserialize;
use utoipa::ToSchema;

/// Client payload for a new response. Author and approval flag are
/// server-assigned; the parent must be an in-progress request visible to
/// the caller.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateResponseInput {
    pub request_id: i32,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateResponseInput {
    pub body: String,
}
