use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::AppError;

use super::claims::Claims;

pub const ISSUER: &str = "orgdesk";

/// Issue an HS256 token for the given user, valid for `expiry_minutes`.
pub fn issue_token(
    user_id: i32,
    username: &str,
    secret: &str,
    expiry_minutes: i64,
) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        iss: ISSUER.to_string(),
        iat: now,
        exp: now + expiry_minutes * 60,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Validate a token's signature, issuer and expiry, returning its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AppError::Unauthorized(format!("Token validation failed: {}", e)))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    #[test]
    fn test_issue_and_verify_token() {
        let token = issue_token(42, "operator", SECRET, 60).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "operator");
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(42, "operator", SECRET, 60).unwrap();
        let result = verify_token(&token, "another_secret_entirely");

        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(42, "operator", SECRET, -10).unwrap();
        let result = verify_token(&token, SECRET);

        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.token", SECRET).is_err());
    }
}
