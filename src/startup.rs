use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{handlers, middleware, openapi::ApiDoc};

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    // Auth routes
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth_handler::login))
        .route("/me", get(handlers::auth_handler::get_me));

    // User routes
    let user_routes = Router::new()
        .route("/", get(handlers::users_handler::list_users))
        .route("/", post(handlers::users_handler::create_user))
        .route("/{id}", get(handlers::users_handler::get_user))
        .route("/{id}", put(handlers::users_handler::update_user))
        .route("/{id}", delete(handlers::users_handler::delete_user));

    // Org unit routes
    let org_unit_routes = Router::new()
        .route("/", get(handlers::org_units_handler::list_org_units))
        .route("/", post(handlers::org_units_handler::create_org_unit))
        .route("/{id}", put(handlers::org_units_handler::update_org_unit))
        .route("/{id}", delete(handlers::org_units_handler::delete_org_unit));

    // Request routes
    let request_routes = Router::new()
        .route("/", get(handlers::requests_handler::list_requests))
        .route("/", post(handlers::requests_handler::create_request))
        .route("/{id}", get(handlers::requests_handler::get_request))
        .route("/{id}", put(handlers::requests_handler::update_request))
        .route("/{id}", delete(handlers::requests_handler::delete_request));

    // Incoming request routes (read-only)
    let incoming_routes =
        Router::new().route("/", get(handlers::incoming_handler::list_incoming_requests));

    // Response routes - /candidates must come before /{id}
    let response_routes = Router::new()
        .route("/", get(handlers::responses_handler::list_responses))
        .route("/", post(handlers::responses_handler::create_response))
        .route("/candidates", get(handlers::responses_handler::list_candidate_requests))
        .route("/{id}", get(handlers::responses_handler::get_response))
        .route("/{id}", put(handlers::responses_handler::update_response))
        .route("/{id}", delete(handlers::responses_handler::delete_response));

    // Maintenance type routes
    let maintenance_type_routes = Router::new()
        .route("/", get(handlers::maintenance_handler::list_maintenance_types))
        .route("/", post(handlers::maintenance_handler::create_maintenance_type))
        .route("/{id}", put(handlers::maintenance_handler::update_maintenance_type))
        .route("/{id}", delete(handlers::maintenance_handler::delete_maintenance_type));

    // Object catalog routes
    let object_routes = Router::new()
        .route("/", get(handlers::maintenance_handler::list_objects))
        .route("/", post(handlers::maintenance_handler::create_object))
        .route("/{id}", put(handlers::maintenance_handler::update_object))
        .route("/{id}", delete(handlers::maintenance_handler::delete_object));

    // Maintenance record routes
    let maintenance_record_routes = Router::new()
        .route("/", get(handlers::maintenance_handler::list_maintenance_records))
        .route("/", post(handlers::maintenance_handler::create_maintenance_record))
        .route("/{id}", put(handlers::maintenance_handler::update_maintenance_record))
        .route("/{id}", delete(handlers::maintenance_handler::delete_maintenance_record));

    // Document routes
    let document_routes = Router::new()
        .route("/", get(handlers::documents_handler::list_documents))
        .route("/", post(handlers::documents_handler::create_document))
        .route("/{id}", put(handlers::documents_handler::update_document))
        .route("/{id}", delete(handlers::documents_handler::delete_document));

    // Notification routes
    let notification_routes = Router::new()
        .route("/", get(handlers::notifications_handler::list_notifications))
        .route("/", post(handlers::notifications_handler::create_notification))
        .route("/{id}", put(handlers::notifications_handler::update_notification))
        .route("/{id}", delete(handlers::notifications_handler::delete_notification));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/org-units", org_unit_routes)
        .nest("/api/requests", request_routes)
        .nest("/api/incoming-requests", incoming_routes)
        .nest("/api/responses", response_routes)
        .nest("/api/maintenance-types", maintenance_type_routes)
        .nest("/api/objects", object_routes)
        .nest("/api/maintenance-records", maintenance_record_routes)
        .nest("/api/documents", document_routes)
        .nest("/api/notifications", notification_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(axum_middleware::from_fn(middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
