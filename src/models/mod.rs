pub mod document;
pub mod maintenance;
pub mod notification;
pub mod org_unit;
pub mod org_unit_input;
pub mod request;
pub mod request_input;
pub mod response;
pub mod response_input;
pub mod user;
pub mod user_input;

pub use document::{CreateDocumentInput, Document, UpdateDocumentInput};
pub use maintenance::{
    CreateMaintenanceRecordInput, MaintenanceRecord, MaintenanceType, MaintenanceTypeInput,
    ObjectEntry, ObjectEntryInput, UpdateMaintenanceRecordInput,
};
pub use notification::{CreateNotificationInput, Notification, UpdateNotificationInput};
pub use org_unit::OrgUnit;
pub use org_unit_input::{CreateOrgUnitInput, UpdateOrgUnitInput};
pub use request::{RequestDetail, RequestStatus, RequestWithResponses};
pub use request_input::{CreateRequestInput, UpdateRequestInput};
pub use response::ResponseDetail;
pub use response_input::{CreateResponseInput, UpdateResponseInput};
pub use user::User;
pub use user_input::{CreateUserInput, UpdateUserInput};
