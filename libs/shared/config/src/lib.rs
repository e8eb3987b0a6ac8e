use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identity assertions are valid for a fixed window; not configurable.
pub const TOKEN_TTL_HOURS: i64 = 24;

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseBackend {
    Supabase,
    Memory,
}

impl FromStr for DatabaseBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "supabase" | "postgrest" => Ok(DatabaseBackend::Supabase),
            "memory" | "in-memory" => Ok(DatabaseBackend::Memory),
            other => Err(format!("unknown database backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub port: u16,
    pub database_backend: DatabaseBackend,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            port: env::var("PORT")
                .ok()
                .and_then(|raw| {
                    raw.parse().map_err(|_| warn!("PORT '{}' is not a valid port, using default", raw)).ok()
                })
                .unwrap_or(DEFAULT_PORT),
            database_backend: env::var("DATABASE_BACKEND")
                .ok()
                .and_then(|raw| {
                    raw.parse().map_err(|e: String| warn!("{}, using supabase", e)).ok()
                })
                .unwrap_or(DatabaseBackend::Supabase),
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let store_ready = match self.database_backend {
            DatabaseBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
            }
            DatabaseBackend::Memory => true,
        };

        store_ready && !self.jwt_secret.is_empty()
    }

    pub fn admin_bootstrap(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: DatabaseBackend) -> AppConfig {
        AppConfig {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            jwt_secret: "secret".to_string(),
            port: DEFAULT_PORT,
            database_backend: backend,
            admin_email: None,
            admin_password: None,
        }
    }

    #[test]
    fn backend_parses_aliases() {
        assert_eq!("Supabase".parse::<DatabaseBackend>(), Ok(DatabaseBackend::Supabase));
        assert_eq!(" memory ".parse::<DatabaseBackend>(), Ok(DatabaseBackend::Memory));
        assert!("mysql".parse::<DatabaseBackend>().is_err());
    }

    #[test]
    fn memory_backend_needs_only_secret() {
        assert!(config(DatabaseBackend::Memory).is_configured());
        assert!(!config(DatabaseBackend::Supabase).is_configured());
    }

    #[test]
    fn admin_bootstrap_requires_both_values() {
        let mut cfg = config(DatabaseBackend::Memory);
        cfg.admin_email = Some("root@clinic.test".to_string());
        assert!(cfg.admin_bootstrap().is_none());

        cfg.admin_password = Some("changeme123".to_string());
        assert_eq!(cfg.admin_bootstrap(), Some(("root@clinic.test", "changeme123")));
    }
}
