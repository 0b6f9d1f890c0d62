use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "orgdesk API",
        version = "0.1.0",
        description = "Role-scoped request/approval backend for organizational units"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Auth
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::get_me,

        // Users
        crate::handlers::users_handler::list_users,
        crate::handlers::users_handler::get_user,
        crate::handlers::users_handler::create_user,
        crate::handlers::users_handler::update_user,
        crate::handlers::users_handler::delete_user,

        // Org units
        crate::handlers::org_units_handler::list_org_units,
        crate::handlers::org_units_handler::create_org_unit,
        crate::handlers::org_units_handler::update_org_unit,
        crate::handlers::org_units_handler::delete_org_unit,

        // Requests
        crate::handlers::requests_handler::list_requests,
        crate::handlers::requests_handler::get_request,
        crate::handlers::requests_handler::create_request,
        crate::handlers::requests_handler::update_request,
        crate::handlers::requests_handler::delete_request,

        // Incoming requests
        crate::handlers::incoming_handler::list_incoming_requests,

        // Responses
        crate::handlers::responses_handler::list_responses,
        crate::handlers::responses_handler::list_candidate_requests,
        crate::handlers::responses_handler::create_response,
        crate::handlers::responses_handler::get_response,
        crate::handlers::responses_handler::update_response,
        crate::handlers::responses_handler::delete_response,

        // Maintenance catalog
        crate::handlers::maintenance_handler::list_maintenance_types,
        crate::handlers::maintenance_handler::create_maintenance_type,
        crate::handlers::maintenance_handler::update_maintenance_type,
        crate::handlers::maintenance_handler::delete_maintenance_type,
        crate::handlers::maintenance_handler::list_objects,
        crate::handlers::maintenance_handler::create_object,
        crate::handlers::maintenance_handler::update_object,
        crate::handlers::maintenance_handler::delete_object,
        crate::handlers::maintenance_handler::list_maintenance_records,
        crate::handlers::maintenance_handler::create_maintenance_record,
        crate::handlers::maintenance_handler::update_maintenance_record,
        crate::handlers::maintenance_handler::delete_maintenance_record,

        // Documents
        crate::handlers::documents_handler::list_documents,
        crate::handlers::documents_handler::create_document,
        crate::handlers::documents_handler::update_document,
        crate::handlers::documents_handler::delete_document,

        // Notifications
        crate::handlers::notifications_handler::list_notifications,
        crate::handlers::notifications_handler::create_notification,
        crate::handlers::notifications_handler::update_notification,
        crate::handlers::notifications_handler::delete_notification,
    ),
    components(
        schemas(
            // Core models
            crate::models::User,
            crate::models::OrgUnit,
            crate::models::RequestDetail,
            crate::models::RequestWithResponses,
            crate::models::ResponseDetail,
            crate::models::MaintenanceType,
            crate::models::ObjectEntry,
            crate::models::MaintenanceRecord,
            crate::models::Document,
            crate::models::Notification,

            // Input models
            crate::models::CreateUserInput,
            crate::models::UpdateUserInput,
            crate::models::CreateOrgUnitInput,
            crate::models::UpdateOrgUnitInput,
            crate::models::CreateRequestInput,
            crate::models::UpdateRequestInput,
            crate::models::CreateResponseInput,
            crate::models::UpdateResponseInput,
            crate::models::MaintenanceTypeInput,
            crate::models::ObjectEntryInput,
            crate::models::CreateMaintenanceRecordInput,
            crate::models::UpdateMaintenanceRecordInput,
            crate::models::CreateDocumentInput,
            crate::models::UpdateDocumentInput,
            crate::models::CreateNotificationInput,
            crate::models::UpdateNotificationInput,

            // Envelopes
            crate::pagination::Paginated<crate::models::RequestDetail>,
            crate::pagination::Paginated<crate::models::RequestWithResponses>,
            crate::pagination::Paginated<crate::models::ResponseDetail>,
            crate::pagination::Paginated<crate::models::ObjectEntry>,
            crate::pagination::Paginated<crate::models::MaintenanceRecord>,
            crate::pagination::Paginated<crate::models::Document>,
            crate::pagination::Paginated<crate::models::Notification>,

            // Auth types
            crate::handlers::auth_handler::LoginRequest,
            crate::handlers::auth_handler::LoginResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User directory"),
        (name = "org-units", description = "Organizational unit catalog"),
        (name = "requests", description = "Request submission"),
        (name = "incoming-requests", description = "Requests addressed to the caller's unit"),
        (name = "responses", description = "Responses closing requests"),
        (name = "maintenance", description = "Maintenance catalog and schedule"),
        (name = "documents", description = "Document records"),
        (name = "notifications", description = "Notification records"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}
