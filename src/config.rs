use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub token_expiry_minutes: i64,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        if jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 bytes".to_string());
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let token_expiry_minutes = match env::var("TOKEN_EXPIRY_MINUTES") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|_| "TOKEN_EXPIRY_MINUTES must be an integer".to_string())?,
            Err(_) => 480,
        };

        if token_expiry_minutes <= 0 {
            return Err("TOKEN_EXPIRY_MINUTES must be positive".to_string());
        }

        let admin_password = env::var("ADMIN_PASSWORD").ok();

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            token_expiry_minutes,
            admin_password,
        })
    }
}
