use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i32,     // User id
    pub username: String,
    pub iss: String,  // Issuer
    pub iat: i64,     // Issued at timestamp
    pub exp: i64,     // Expiration timestamp
}
