use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use std::sync::Arc;

use crate::{auth, models::User, AppError, AppState};

/// The caller's identity, validated from the Bearer token and backed by a
/// live user row. Scope fields are carried along so handlers never re-fetch
/// the user just to derive visibility.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub is_admin: bool,
    pub org_unit_id: Option<i32>,
    pub station_name: Option<String>,
}

impl AuthenticatedUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_superuser: user.is_superuser,
            is_admin: user.is_admin,
            org_unit_id: user.org_unit_id,
            station_name: user.station_name.clone(),
        }
    }

    /// Superuser or explicit admin capability.
    pub fn is_staff(&self) -> bool {
        self.is_superuser || self.is_admin
    }
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Unauthorized("Missing or malformed Authorization header".to_string())
                })?;

        let claims = auth::verify_token(bearer.token(), &state.config.jwt_secret)?;

        // Token subjects are re-checked against the database so revoked or
        // deleted accounts lose access as soon as the row is gone.
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "Users" WHERE id = $1"#)
            .bind(claims.sub)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = claims.sub, "User lookup failed");
                AppError::Database(e)
            })?
            .ok_or_else(|| {
                tracing::warn!(user_id = claims.sub, "Token subject no longer exists");
                AppError::Unauthorized("Unknown user".to_string())
            })?;

        Ok(AuthenticatedUser::from_user(&user))
    }
}
