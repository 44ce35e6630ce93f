use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::error::{AllocationError, Result};
use crate::models::{Role, Session};

/// Hash a password using SHA-256, hex encoded
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Account allowed to sign in
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl UserAccount {
    pub fn new(username: &str, password: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password_hash: hash_password(password),
            role,
        }
    }
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    exp: i64,
    iat: i64,
}

/// Token issued on successful login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub session: Session,
    pub expires_at: DateTime<Utc>,
}

/// Credential check and session token handling
pub struct AuthService {
    users: HashMap<String, UserAccount>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(jwt_secret: &str, token_ttl: Duration, accounts: Vec<UserAccount>) -> Self {
        let users = accounts
            .into_iter()
            .map(|account| (account.username.clone(), account))
            .collect();

        Self {
            users,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl,
        }
    }

    /// Verify credentials and issue a signed session token
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken> {
        let account = self
            .users
            .get(username)
            .filter(|account| account.password_hash == hash_password(password))
            .ok_or_else(|| {
                tracing::info!("Failed login attempt for {}", username);
                AllocationError::Unauthorized("invalid username or password".to_string())
            })?;

        let issued_at = Utc::now();
        let expires_at = issued_at + self.token_ttl;
        let claims = Claims {
            sub: account.username.clone(),
            role: account.role,
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AllocationError::Internal(format!("failed to sign token: {}", e)))?;

        tracing::info!("{} logged in as {:?}", account.username, account.role);

        Ok(IssuedToken {
            token,
            session: Session {
                physician_id: account.username.clone(),
                role: account.role,
            },
            expires_at,
        })
    }

    /// Decode a bearer token back into the caller's session
    pub fn verify(&self, token: &str) -> Result<Session> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AllocationError::Unauthorized(format!("invalid session token: {}", e)))?;

        if !self.users.contains_key(&data.claims.sub) {
            return Err(AllocationError::Unauthorized(format!(
                "unknown account {}",
                data.claims.sub
            )));
        }

        Ok(Session {
            physician_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(
            "test-secret",
            Duration::minutes(30),
            vec![
                UserAccount::new("dr.smith", "password123", Role::Physician),
                UserAccount::new("admin", "admin123", Role::Administrator),
            ],
        )
    }

    #[test]
    fn test_hash_password() {
        assert_eq!(
            hash_password("password123"),
            "ef92b778bafe771e89245b89ecbc08a44a4e166c06659911881f383d4473e94f"
        );
    }

    #[test]
    fn test_login_and_verify() {
        let auth = service();
        let issued = auth.login("admin", "admin123").unwrap();

        let session = auth.verify(&issued.token).unwrap();
        assert_eq!(session.physician_id, "admin");
        assert_eq!(session.role, Role::Administrator);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let auth = service();
        assert!(matches!(
            auth.login("dr.smith", "nope"),
            Err(AllocationError::Unauthorized(_))
        ));
        assert!(matches!(
            auth.login("nobody", "password123"),
            Err(AllocationError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = service();
        assert!(matches!(auth.verify("not-a-token"), Err(AllocationError::Unauthorized(_))));
    }
}
