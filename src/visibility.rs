//! The role-based predicate deciding which org-unit-scoped records a caller
//! may see. Every scoped listing (requests, incoming requests, responses,
//! response candidates) goes through this module; deriving the predicate ad
//! hoc per handler is how visibility bugs happen.

use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;

use crate::{extractors::AuthenticatedUser, AppResult};

// Station names change rarely; cache the name -> unit lookup briefly.
static STATION_CACHE: Lazy<Cache<String, Option<i32>>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60))
        .max_capacity(1_000)
        .build()
});

/// Drop cached station resolutions after org-unit mutations.
pub fn invalidate_station_cache() {
    STATION_CACHE.invalidate_all();
}

/// A user's home scope as classified from their account alone, before any
/// database lookup. Precedence: superuser, then direct org unit, then
/// station reference, then nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Superuser,
    OrgUnit(i32),
    Station(String),
    Unscoped,
}

impl Scope {
    pub fn of(user: &AuthenticatedUser) -> Scope {
        if user.is_superuser {
            Scope::Superuser
        } else if let Some(unit_id) = user.org_unit_id {
            Scope::OrgUnit(unit_id)
        } else if let Some(name) = user.station_name.as_deref() {
            Scope::Station(name.to_string())
        } else {
            Scope::Unscoped
        }
    }
}

/// The resolved predicate: everything, one unit, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    Unit(i32),
    Nothing,
}

impl Visibility {
    /// Collapse a user's scope against the database. A station resolves to
    /// an org unit by exact name match (names are unique); an unmatched
    /// station, like a user with no scope at all, sees nothing.
    pub async fn resolve(db: &PgPool, user: &AuthenticatedUser) -> AppResult<Visibility> {
        match Scope::of(user) {
            Scope::Superuser => Ok(Visibility::All),
            Scope::OrgUnit(unit_id) => Ok(Visibility::Unit(unit_id)),
            Scope::Station(name) => {
                if let Some(cached) = STATION_CACHE.get(&name).await {
                    return Ok(cached.map_or(Visibility::Nothing, Visibility::Unit));
                }

                let unit_id: Option<i32> =
                    sqlx::query_scalar(r#"SELECT id FROM "OrgUnits" WHERE name = $1"#)
                        .bind(&name)
                        .fetch_optional(db)
                        .await?;

                STATION_CACHE.insert(name, unit_id).await;
                Ok(unit_id.map_or(Visibility::Nothing, Visibility::Unit))
            }
            Scope::Unscoped => Ok(Visibility::Nothing),
        }
    }

    pub fn allows(&self, org_unit_id: i32) -> bool {
        match self {
            Visibility::All => true,
            Visibility::Unit(unit_id) => *unit_id == org_unit_id,
            Visibility::Nothing => false,
        }
    }

    /// Append this predicate to a dynamic WHERE clause being assembled with
    /// a `QueryBuilder`. `column` is the qualified org-unit column the
    /// collection is scoped by, e.g. `r.org_unit_id`.
    pub fn push_predicate(&self, qb: &mut QueryBuilder<'_, Postgres>, column: &str) {
        match self {
            Visibility::All => {}
            Visibility::Unit(unit_id) => {
                qb.push(" AND ");
                qb.push(column);
                qb.push(" = ");
                qb.push_bind(*unit_id);
            }
            Visibility::Nothing => {
                qb.push(" AND false");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(
        is_superuser: bool,
        org_unit_id: Option<i32>,
        station_name: Option<&str>,
    ) -> AuthenticatedUser {
        AuthenticatedUser {
            id: 1,
            username: "tester".to_string(),
            is_superuser,
            is_admin: false,
            org_unit_id,
            station_name: station_name.map(String::from),
        }
    }

    #[test]
    fn test_scope_superuser_wins() {
        let u = user(true, Some(7), Some("Depot-3"));
        assert_eq!(Scope::of(&u), Scope::Superuser);
    }

    #[test]
    fn test_scope_org_unit_beats_station() {
        let u = user(false, Some(7), Some("Depot-3"));
        assert_eq!(Scope::of(&u), Scope::OrgUnit(7));
    }

    #[test]
    fn test_scope_station_then_unscoped() {
        let u = user(false, None, Some("Depot-3"));
        assert_eq!(Scope::of(&u), Scope::Station("Depot-3".to_string()));

        let u = user(false, None, None);
        assert_eq!(Scope::of(&u), Scope::Unscoped);
    }

    #[test]
    fn test_allows() {
        assert!(Visibility::All.allows(3));
        assert!(Visibility::Unit(3).allows(3));
        assert!(!Visibility::Unit(3).allows(4));
        assert!(!Visibility::Nothing.allows(3));
    }

    #[test]
    fn test_push_predicate_all_is_noop() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE 1=1");
        Visibility::All.push_predicate(&mut qb, "r.org_unit_id");
        assert_eq!(qb.into_sql(), "SELECT 1 WHERE 1=1");
    }

    #[test]
    fn test_push_predicate_unit_binds_id() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE 1=1");
        Visibility::Unit(9).push_predicate(&mut qb, "r.org_unit_id");
        assert_eq!(qb.into_sql(), "SELECT 1 WHERE 1=1 AND r.org_unit_id = $1");
    }

    #[test]
    fn test_push_predicate_nothing_blocks() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE 1=1");
        Visibility::Nothing.push_predicate(&mut qb, "r.org_unit_id");
        assert_eq!(qb.into_sql(), "SELECT 1 WHERE 1=1 AND false");
    }
}
