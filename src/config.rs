use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Which credential store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    /// Process-local, lost on restart. Local development only.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub store_timeout_ms: u64,
    pub bcrypt_cost: u32,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let store = match std::env::var("USER_STORE").as_deref() {
            Err(_) | Ok("postgres") => StoreBackend::Postgres,
            Ok("memory") => StoreBackend::Memory,
            Ok(other) => bail!("unknown USER_STORE '{other}', expected postgres or memory"),
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        if store == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when USER_STORE=postgres");
        }

        let bcrypt_cost = env_parse("BCRYPT_COST", 10)?;
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be within 4..=31, got {bcrypt_cost}");
        }

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tripmates".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "tripmates-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60)?,
        };

        Ok(Self {
            store,
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 10)?,
            store_timeout_ms: env_parse("STORE_TIMEOUT_MS", 5_000)?,
            bcrypt_cost,
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT", 5000)?,
        })
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_var(key, std::env::var(key).ok(), default)
}

/// An unset variable takes the default; a set one must parse.
fn parse_var<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has invalid value '{v}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_takes_default() {
        assert_eq!(parse_var::<u16>("APP_PORT", None, 5000).unwrap(), 5000);
    }

    #[test]
    fn set_variable_is_parsed() {
        assert_eq!(
            parse_var::<u32>("BCRYPT_COST", Some("12".into()), 10).unwrap(),
            12
        );
        assert_eq!(
            parse_var::<u64>("STORE_TIMEOUT_MS", Some(" 250 ".into()), 5_000).unwrap(),
            250
        );
    }

    #[test]
    fn unparseable_variable_is_an_error() {
        let err = parse_var::<u32>("BCRYPT_COST", Some("twelve".into()), 10).unwrap_err();
        assert!(err.to_string().contains("BCRYPT_COST"));

        assert!(parse_var::<u16>("APP_PORT", Some("70000".into()), 5000).is_err());
        assert!(parse_var::<i64>("JWT_TTL_MINUTES", Some("".into()), 60).is_err());
    }
}
