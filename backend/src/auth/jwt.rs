//! JWT token generation and validation
//!
//! Access and refresh tokens are HS256-signed and carry an explicit
//! `token_type` claim so one can never stand in for the other.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::accounts::Account;
use crate::config::AuthConfig;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token is missing the {0} claim")]
    MissingClaim(&'static str),

    #[error("Expected {expected} token, got {actual}")]
    WrongType {
        expected: &'static str,
        actual: String,
    },
}

/// Token type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Verified token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,
    pub user_id: String,
    pub username: String,
    /// Present on access tokens only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    pub jti: String,
    pub token_type: TokenType,
}

/// Wire form; required claims are checked after signature validation
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    iat: Option<i64>,
    exp: i64,
    #[serde(default)]
    jti: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

/// Access and refresh token minted together
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Mints signed tokens for an account
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    pub fn issue_access(&self, account: &Account) -> Result<String, JwtError> {
        self.issue(account, TokenType::Access, self.access_ttl)
    }

    pub fn issue_refresh(&self, account: &Account) -> Result<String, JwtError> {
        self.issue(account, TokenType::Refresh, self.refresh_ttl)
    }

    pub fn issue_pair(&self, account: &Account) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access: self.issue_access(account)?,
            refresh: self.issue_refresh(account)?,
        })
    }

    fn issue(
        &self,
        account: &Account,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = now + ttl;

        let email = match token_type {
            TokenType::Access => Some(account.email.clone()),
            TokenType::Refresh => None,
        };

        let claims = Claims {
            sub: account.id.to_string(),
            user_id: account.id.to_string(),
            username: account.username.clone(),
            email,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }
}

/// Validates signature, expiry and token type
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let raw = decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed(e.to_string()),
            })?
            .claims;

        let username = raw
            .username
            .filter(|username| !username.is_empty())
            .ok_or(JwtError::MissingClaim("username"))?;

        let token_type = match raw.token_type.as_deref() {
            None => return Err(JwtError::MissingClaim("token_type")),
            Some(actual) if actual == expected.as_str() => expected,
            Some(actual) => {
                return Err(JwtError::WrongType {
                    expected: expected.as_str(),
                    actual: actual.to_string(),
                })
            }
        };

        let sub = raw.sub.ok_or(JwtError::MissingClaim("sub"))?;

        Ok(Claims {
            user_id: raw.user_id.unwrap_or_else(|| sub.clone()),
            sub,
            username,
            email: raw.email,
            iat: raw.iat.unwrap_or_default(),
            exp: raw.exp,
            jti: raw.jti.unwrap_or_default(),
            token_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig::with_secret(secret)
    }

    fn create_test_account() -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: String::new(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            phone_number: "9876543210".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_claims() {
        let account = create_test_account();
        let config = config("test-secret-key");
        let token = TokenIssuer::new(&config).issue_access(&account).unwrap();

        let claims = TokenVerifier::new(&config)
            .verify(&token, TokenType::Access)
            .unwrap();
        assert_eq!(claims.sub, account.id.to_string());
        assert_eq!(claims.user_id, account.id.to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_token_claims() {
        let account = create_test_account();
        let config = config("test-secret-key");
        let token = TokenIssuer::new(&config).issue_refresh(&account).unwrap();

        let claims = TokenVerifier::new(&config)
            .verify(&token, TokenType::Refresh)
            .unwrap();
        assert_eq!(claims.email, None);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let account = create_test_account();
        let config = config("test-secret-key");
        let pair = TokenIssuer::new(&config).issue_pair(&account).unwrap();
        let verifier = TokenVerifier::new(&config);

        assert!(matches!(
            verifier.verify(&pair.refresh, TokenType::Access),
            Err(JwtError::WrongType { .. })
        ));
        assert!(matches!(
            verifier.verify(&pair.access, TokenType::Refresh),
            Err(JwtError::WrongType { .. })
        ));
    }

    #[test]
    fn test_invalid_token() {
        let verifier = TokenVerifier::new(&config("test-secret-key"));
        assert!(matches!(
            verifier.verify("invalid.token.here", TokenType::Access),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let account = create_test_account();
        let token = TokenIssuer::new(&config("secret1"))
            .issue_access(&account)
            .unwrap();

        let result = TokenVerifier::new(&config("secret2")).verify(&token, TokenType::Access);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(
            &serde_json::json!({
                "sub": "1",
                "user_id": "1",
                "username": "alice",
                "iat": now - 120,
                "exp": now - 1,
                "jti": "x",
                "token_type": "access",
            }),
            "test-secret-key",
        );

        let result =
            TokenVerifier::new(&config("test-secret-key")).verify(&token, TokenType::Access);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_missing_username_or_type_rejected() {
        let exp = Utc::now().timestamp() + 60;
        let verifier = TokenVerifier::new(&config("test-secret-key"));

        let no_username = sign(
            &serde_json::json!({"sub": "1", "exp": exp, "token_type": "access"}),
            "test-secret-key",
        );
        assert!(matches!(
            verifier.verify(&no_username, TokenType::Access),
            Err(JwtError::MissingClaim("username"))
        ));

        let no_type = sign(
            &serde_json::json!({"sub": "1", "username": "alice", "exp": exp}),
            "test-secret-key",
        );
        assert!(matches!(
            verifier.verify(&no_type, TokenType::Access),
            Err(JwtError::MissingClaim("token_type"))
        ));
    }
}
