use crate::schema::Claims;
use chrono::{Duration, Utc};
use enlace_error::error::AuthError;
use enlace_settings::config::AuthSettings;
use enlace_sql::schemas::schema::User;
use enlace_utils::utils::create_uuid4;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use password_auth::{generate_hash, verify_password};

/// Signs and validates session tokens and checks credentials
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_minutes: i64,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("expiry_minutes", &self.expiry_minutes)
            .finish()
    }
}

impl AuthManager {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            expiry_minutes: settings.jwt_expiry_minutes,
        }
    }

    /// Issue a token for a new session of `user`. Every call opens a new session id.
    pub fn generate_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role.clone(),
            sid: create_uuid4(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.expiry_minutes)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenEncodeError(e.to_string()))
    }

    /// Decode a token, rejecting bad signatures and expired tokens
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Check a login attempt. Inactive users are refused even with the right password.
    pub fn validate_user(&self, user: &User, password: &str) -> Result<(), AuthError> {
        verify_password(password, &user.password_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        if !user.active {
            return Err(AuthError::InactiveUser(user.username.clone()));
        }

        Ok(())
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::HashError("password cannot be empty".to_string()));
    }
    Ok(generate_hash(password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enlace_utils::utils::get_utc_datetime;

    fn manager(expiry_minutes: i64) -> AuthManager {
        AuthManager::new(&AuthSettings {
            jwt_secret: "test-secret-test-secret-test-sec".to_string(),
            jwt_expiry_minutes: expiry_minutes,
        })
    }

    fn user(active: bool) -> User {
        User {
            id: 7,
            created_at: get_utc_datetime(),
            username: "ana".to_string(),
            password_hash: hash_password("correct horse").unwrap(),
            role: "coordinator".to_string(),
            active,
        }
    }

    #[test]
    fn test_jwt_roundtrip_claims() {
        let manager = manager(60);
        let user = user(true);

        let token = manager.generate_jwt(&user).unwrap();
        let claims = manager.validate_jwt(&token).unwrap();

        assert_eq!(claims.sub, "ana");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, "coordinator");
        assert!(claims.exp > claims.iat);

        // each login is its own session
        let other = manager.validate_jwt(&manager.generate_jwt(&user).unwrap()).unwrap();
        assert_ne!(claims.sid, other.sid);
    }

    #[test]
    fn test_jwt_rejects_expired_and_foreign_tokens() {
        let user = user(true);

        let expired = manager(-5).generate_jwt(&user).unwrap();
        assert!(manager(60).validate_jwt(&expired).is_err());

        let foreign = AuthManager::new(&AuthSettings {
            jwt_secret: "another-secret".to_string(),
            jwt_expiry_minutes: 60,
        })
        .generate_jwt(&user)
        .unwrap();
        assert!(manager(60).validate_jwt(&foreign).is_err());
        assert!(manager(60).validate_jwt("not.a.token").is_err());
    }

    #[test]
    fn test_validate_user() {
        let manager = manager(60);

        assert!(manager.validate_user(&user(true), "correct horse").is_ok());
        assert!(matches!(
            manager.validate_user(&user(true), "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            manager.validate_user(&user(false), "correct horse"),
            Err(AuthError::InactiveUser(_))
        ));
    }

    #[test]
    fn test_hash_password_rejects_empty() {
        assert!(hash_password("").is_err());
    }
}
