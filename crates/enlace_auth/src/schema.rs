use serde::{Deserialize, Serialize};

/// Claims carried by every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub role: String,
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity of the caller, decoded once per request and passed explicitly to handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
    pub user_id: i64,
    pub username: String,
    pub role: String,
    /// token expiry, unix seconds
    pub expires_at: i64,
}

impl From<Claims> for SessionContext {
    fn from(claims: Claims) -> Self {
        SessionContext {
            session_id: claims.sid,
            user_id: claims.user_id,
            username: claims.sub,
            role: claims.role,
            expires_at: claims.exp,
        }
    }
}

/// Role currently assigned to a user, as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: String,
    pub active: bool,
}
