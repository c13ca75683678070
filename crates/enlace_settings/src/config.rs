use enlace_error::error::SettingsError;
use enlace_types::RequiresDataPolicy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::env;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum SqlType {
    Postgres,
    Sqlite,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Postgres => write!(f, "postgres"),
            SqlType::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl SqlType {
    /// Infer the backend from a connection uri scheme
    pub fn from_uri(uri: &str) -> Result<SqlType, SettingsError> {
        let uri_lower = uri.trim().to_lowercase();
        if uri_lower.starts_with("postgres://") || uri_lower.starts_with("postgresql://") {
            Ok(SqlType::Postgres)
        } else if uri_lower.starts_with("sqlite:") {
            Ok(SqlType::Sqlite)
        } else {
            Err(SettingsError::UnsupportedDatabase(uri.to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub connection_uri: String,
    pub max_connections: u32,
    pub sql_type: SqlType,
}

/// Settings used to sign and validate session tokens
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
}

/// EnlaceConfig is the primary configuration struct for the enlace server.
/// `Default` reads every value from the environment with a development friendly
/// fallback. The requires-data policy is only read by `from_env`, which rejects
/// unknown policies.
#[derive(Debug, Clone)]
pub struct EnlaceConfig {
    pub app_name: String,
    pub app_env: String,
    pub app_version: String,
    pub port: u16,
    pub database_uri: String,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub menu_path: Option<PathBuf>,
    pub requires_data_policy: RequiresDataPolicy,
    pub log_level: String,
}

impl Default for EnlaceConfig {
    fn default() -> Self {
        EnlaceConfig {
            app_name: "enlace".to_string(),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            port: env::var("ENLACE_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            database_uri: env::var("ENLACE_DATABASE_URI")
                .unwrap_or_else(|_| "sqlite::memory:".to_string()),
            max_connections: env::var("ENLACE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            jwt_secret: env::var("ENLACE_JWT_SECRET").unwrap_or_else(|_| generate_jwt_secret()),
            jwt_expiry_minutes: env::var("ENLACE_JWT_EXPIRY_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            admin_username: env::var("ENLACE_ADMIN_USERNAME").ok(),
            admin_password: env::var("ENLACE_ADMIN_PASSWORD").ok(),
            menu_path: env::var("ENLACE_MENU_PATH").ok().map(PathBuf::from),
            requires_data_policy: RequiresDataPolicy::default(),
            log_level: env::var("ENLACE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

fn generate_jwt_secret() -> String {
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect()
}

/// Parse the configured policy. An unset value means the default, a value that
/// names no policy is an error.
fn parse_policy(value: Option<&str>) -> Result<RequiresDataPolicy, SettingsError> {
    match value {
        Some(policy) => policy.parse(),
        None => Ok(RequiresDataPolicy::default()),
    }
}

impl EnlaceConfig {
    /// Load the config from the environment, refusing values that cannot be honored
    pub fn from_env() -> Result<Self, SettingsError> {
        let policy = env::var("ENLACE_REQUIRES_DATA_POLICY").ok();

        Ok(EnlaceConfig {
            requires_data_policy: parse_policy(policy.as_deref())?,
            ..Default::default()
        })
    }

    pub fn database_settings(&self) -> Result<DatabaseSettings, SettingsError> {
        // every connection to an in-memory sqlite database opens a fresh one
        let max_connections = if self.database_uri.contains(":memory:") {
            1
        } else {
            self.max_connections.max(1)
        };

        Ok(DatabaseSettings {
            connection_uri: self.database_uri.clone(),
            max_connections,
            sql_type: SqlType::from_uri(&self.database_uri)?,
        })
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: self.jwt_secret.clone(),
            jwt_expiry_minutes: self.jwt_expiry_minutes,
        }
    }

    /// Credentials of the administrator created at startup, if both are configured
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username.as_str(), password.as_str()))
            }
            _ => None,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
