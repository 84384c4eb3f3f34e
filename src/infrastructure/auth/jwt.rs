//! JWT issuance and verification for access and confirmation tokens

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

use crate::domain::DomainError;

/// Purpose a token was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Authorizes API writes
    Access,
    /// Proves ownership of an email address
    Confirmation,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user email)
    #[serde(default)]
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
    /// What the token may be used for
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl JwtClaims {
    /// Create claims for an email that expire after the given number of minutes
    pub fn new(email: &str, token_type: TokenType, expire_minutes: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(expire_minutes);

        Self {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type,
        }
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign tokens
    pub secret: String,
    /// Lifetime of access tokens in minutes
    pub access_token_expire_minutes: i64,
    /// Lifetime of confirmation tokens in minutes
    pub confirm_token_expire_minutes: i64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(
        secret: impl Into<String>,
        access_token_expire_minutes: i64,
        confirm_token_expire_minutes: i64,
    ) -> Self {
        Self {
            secret: secret.into(),
            access_token_expire_minutes,
            confirm_token_expire_minutes,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expire_minutes: 30,
            confirm_token_expire_minutes: 1440,
        }
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Issue an access token for an email
    fn create_access_token(&self, email: &str) -> Result<String, DomainError>;

    /// Issue a confirmation token for an email
    fn create_confirmation_token(&self, email: &str) -> Result<String, DomainError>;

    /// Verify a token of the expected type and return its subject email
    fn subject_for_token_type(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<String, DomainError>;

    /// Lifetime of access tokens in minutes
    fn access_token_expire_minutes(&self) -> i64;
}

/// JWT service signing with a shared HS256 secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field(
                "access_token_expire_minutes",
                &self.config.access_token_expire_minutes,
            )
            .field(
                "confirm_token_expire_minutes",
                &self.config.confirm_token_expire_minutes,
            )
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn issue(
        &self,
        email: &str,
        token_type: TokenType,
        expire_minutes: i64,
    ) -> Result<String, DomainError> {
        tracing::debug!(token_type = %token_type, "Creating token");

        let claims = JwtClaims::new(email, token_type, expire_minutes);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn decode_claims(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::unauthorized("Token has expired"),
                _ => DomainError::unauthorized("Invalid token"),
            })
    }
}

impl JwtGenerator for JwtService {
    fn create_access_token(&self, email: &str) -> Result<String, DomainError> {
        self.issue(
            email,
            TokenType::Access,
            self.config.access_token_expire_minutes,
        )
    }

    fn create_confirmation_token(&self, email: &str) -> Result<String, DomainError> {
        self.issue(
            email,
            TokenType::Confirmation,
            self.config.confirm_token_expire_minutes,
        )
    }

    fn subject_for_token_type(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<String, DomainError> {
        let claims = self.decode_claims(token)?;

        if claims.sub.is_empty() {
            return Err(DomainError::unauthorized("Token is missing 'sub' field"));
        }

        if claims.token_type != expected {
            return Err(DomainError::unauthorized(format!(
                "Token has incorrect type, expected '{}'",
                expected
            )));
        }

        Ok(claims.sub)
    }

    fn access_token_expire_minutes(&self) -> i64 {
        self.config.access_token_expire_minutes
    }
}
