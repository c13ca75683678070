use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings Error: {0}")]
    Error(String),

    #[error("Unsupported database uri: {0}")]
    UnsupportedDatabase(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Logging Error: {0}")]
    Error(String),
}

#[derive(Error, Debug)]
pub enum SqlError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(String),

    #[error("Failed to run migrations: {0}")]
    MigrationError(String),

    #[error("Failed to run query: {0}")]
    QueryError(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Referenced record does not exist: {0}")]
    InvalidReference(String),

    #[error("Record already exists: {0}")]
    Conflict(String),

    #[error("Sql Error: {0}")]
    GeneralError(String),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User {0} is inactive")]
    InactiveUser(String),

    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to encode token: {0}")]
    TokenEncodeError(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavError {
    #[error("Permissions for this session have already been resolved")]
    AlreadyResolved,

    #[error("Failed to load menu: {0}")]
    MenuError(String),

    #[error("Duplicate section key in menu: {0}")]
    DuplicateSection(String),

    #[error("Category id already used in menu: {0}")]
    DuplicateCategory(String),
}

#[derive(Error, Debug, Serialize)]
pub enum UtilError {
    #[error("Invalid uuid")]
    UuidError,
}
