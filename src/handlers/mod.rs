pub mod auth_handler;
pub mod documents_handler;
pub mod health;
pub mod incoming_handler;
pub mod maintenance_handler;
pub mod metrics;
pub mod notifications_handler;
pub mod org_units_handler;
pub mod requests_handler;
pub mod responses_handler;
pub mod users_handler;

pub use health::health_check;
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
