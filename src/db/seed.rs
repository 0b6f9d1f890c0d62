use rand::{distributions::Alphanumeric, Rng};
use sqlx::PgPool;

use crate::{auth, AppConfig, AppResult};

/// Create the initial superuser when the user table is empty, so a fresh
/// deployment is reachable without manual SQL. The password comes from
/// ADMIN_PASSWORD or is generated and logged once.
pub async fn seed_admin(db: &PgPool, config: &AppConfig) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Users""#)
        .fetch_one(db)
        .await?;

    if count > 0 {
        return Ok(());
    }

    let (password, generated) = match &config.admin_password {
        Some(password) => (password.clone(), false),
        None => (random_password(24), true),
    };

    let password_hash = auth::hash_password(&password)?;

    sqlx::query(
        r#"
        INSERT INTO "Users" (username, full_name, password_hash, is_superuser, is_admin)
        VALUES ('admin', 'Administrator', $1, true, true)
        "#,
    )
    .bind(&password_hash)
    .execute(db)
    .await?;

    if generated {
        tracing::warn!(
            username = "admin",
            password = %password,
            "Seeded initial superuser with a generated password; change it"
        );
    } else {
        tracing::info!(username = "admin", "Seeded initial superuser from ADMIN_PASSWORD");
    }

    Ok(())
}

fn random_password(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_password_shape() {
        let a = random_password(24);
        let b = random_password(24);

        assert_eq!(a.len(), 24);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
