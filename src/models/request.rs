use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

use super::response::ResponseDetail;

/// Lifecycle of a request. The only transition is `InProgress -> Done`,
/// performed exclusively by response creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    InProgress,
    Done,
}

impl RequestStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(RequestStatus::InProgress),
            "done" => Some(RequestStatus::Done),
            _ => None,
        }
    }

    /// Whether a response may still be attached.
    pub const fn can_close(self) -> bool {
        matches!(self, RequestStatus::InProgress)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request row joined with unit and submitter names for presentation.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RequestDetail {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub org_unit_id: i32,
    pub org_unit_name: String,
    pub sender_unit_id: Option<i32>,
    pub sender_unit_name: Option<String>,
    pub created_by: i32,
    pub created_by_username: String,
    pub status: String,
    pub is_approved: bool,
    pub submitted_at: DateTime<Utc>,
}

/// A request together with its responses, as served by the incoming view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestWithResponses {
    #[serde(flatten)]
    pub request: RequestDetail,
    pub responses: Vec<ResponseDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [RequestStatus::InProgress, RequestStatus::Done] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(RequestStatus::parse("pending"), None);
        assert_eq!(RequestStatus::parse(""), None);
        assert_eq!(RequestStatus::parse("IN_PROGRESS"), None);
    }

    #[test]
    fn test_only_in_progress_can_close() {
        assert!(RequestStatus::InProgress.can_close());
        assert!(!RequestStatus::Done.can_close());
    }
}
