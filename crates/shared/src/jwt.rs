//! JWT token utilities using RS256 asymmetric signing.
//!
//! Access and refresh tokens carry the user id, tenant id, and role so
//! request handlers can enforce tenant isolation without an extra lookup.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Tenant the user belongs to
    pub tenant_id: String,
    /// Role within the tenant (`admin` or `affiliate`)
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID (unique token identifier for session tracking)
    pub jti: String,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Type of JWT token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Identity baked into a token: user, tenant, role.
#[derive(Debug, Clone, Copy)]
pub struct TokenIdentity {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Access token expiration in seconds
    pub access_token_expiry_secs: i64,
    /// Refresh token expiration in seconds
    pub refresh_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.refresh_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a new JwtConfig from an RSA key pair in PEM format.
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Result<Self, JwtError> {
        Self::with_leeway(
            private_key_pem,
            public_key_pem,
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            DEFAULT_LEEWAY_SECS,
        )
    }

    /// Creates a new JwtConfig with custom clock-skew leeway.
    pub fn with_leeway(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            leeway_secs,
        })
    }

    /// Creates a JwtConfig for testing with an HS256 symmetric key.
    /// DO NOT use in production - only for tests.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 604800,
            leeway_secs: 0,
        }
    }

    /// Mints an access token for the given identity and role.
    ///
    /// Returns the token string and its `jti`.
    pub fn generate_access_token(
        &self,
        identity: TokenIdentity,
        role: &str,
    ) -> Result<(String, String), JwtError> {
        self.mint(identity, role, TokenType::Access)
    }

    /// Mints a refresh token for the given identity and role.
    pub fn generate_refresh_token(
        &self,
        identity: TokenIdentity,
        role: &str,
    ) -> Result<(String, String), JwtError> {
        self.mint(identity, role, TokenType::Refresh)
    }

    fn mint(
        &self,
        identity: TokenIdentity,
        role: &str,
        token_type: TokenType,
    ) -> Result<(String, String), JwtError> {
        let ttl = match token_type {
            TokenType::Access => self.access_token_expiry_secs,
            TokenType::Refresh => self.refresh_token_expiry_secs,
        };
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: identity.user_id.to_string(),
            tenant_id: identity.tenant_id.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(ttl)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            token_type,
        };

        encode(&Header::new(self.algorithm()), &claims, &self.encoding_key)
            .map(|token| (token, jti))
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates signature and expiry and returns the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm());
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| decode_error(&e))
    }

    /// Validates a token and additionally requires the access type, so a
    /// refresh token can never authenticate a request.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TokenType::Access)
    }

    /// Validates a token and additionally requires the refresh type.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TokenType::Refresh)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    fn algorithm(&self) -> Algorithm {
        // Tests use a symmetric secret, production uses RSA keys.
        #[cfg(test)]
        {
            Algorithm::HS256
        }
        #[cfg(not(test))]
        {
            Algorithm::RS256
        }
    }
}

fn decode_error(e: &jsonwebtoken::errors::Error) -> JwtError {
    use jsonwebtoken::errors::ErrorKind;
    match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidToken | ErrorKind::InvalidSignature => JwtError::InvalidToken,
        _ => JwtError::DecodingError(e.to_string()),
    }
}

/// Extracts the token identity (user id + tenant id) from validated claims.
pub fn extract_identity(claims: &Claims) -> Result<TokenIdentity, JwtError> {
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)?;
    let tenant_id = Uuid::parse_str(&claims.tenant_id).map_err(|_| JwtError::InvalidToken)?;
    Ok(TokenIdentity { user_id, tenant_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    fn create_test_config() -> JwtConfig {
        JwtConfig::new_for_testing("test_secret_key_for_jwt_testing_12345")
    }

    fn test_identity() -> TokenIdentity {
        TokenIdentity {
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_generate_access_token() {
        let config = create_test_config();
        let (token, jti) = config.generate_access_token(test_identity(), "admin").unwrap();

        assert!(!token.is_empty());
        assert!(!jti.is_empty());
        assert!(token.contains('.'), "JWT should have dots separating parts");
    }

    #[test]
    fn test_validate_access_token_roundtrip() {
        let config = create_test_config();
        let identity = test_identity();

        let (token, jti) = config.generate_access_token(identity, "admin").unwrap();
        let claims = config.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, identity.user_id.to_string());
        assert_eq!(claims.tenant_id, identity.tenant_id.to_string());
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let config = create_test_config();
        let (token, _) = config.generate_access_token(test_identity(), "admin").unwrap();

        assert!(matches!(
            config.validate_refresh_token(&token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let config = create_test_config();
        let (token, _) = config
            .generate_refresh_token(test_identity(), "affiliate")
            .unwrap();

        assert!(matches!(
            config.validate_access_token(&token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let mut config = create_test_config();
        config.access_token_expiry_secs = 1;

        let (token, _) = config.generate_access_token(test_identity(), "admin").unwrap();
        sleep(StdDuration::from_secs(2));

        assert!(matches!(
            config.validate_access_token(&token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let config = create_test_config();
        let result = config.validate_token("invalid.token.here");

        assert!(matches!(
            result,
            Err(JwtError::InvalidToken) | Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_extract_identity() {
        let config = create_test_config();
        let identity = test_identity();

        let (token, _) = config.generate_access_token(identity, "affiliate").unwrap();
        let claims = config.validate_access_token(&token).unwrap();
        let extracted = extract_identity(&claims).unwrap();

        assert_eq!(extracted.user_id, identity.user_id);
        assert_eq!(extracted.tenant_id, identity.tenant_id);
    }

    #[test]
    fn test_extract_identity_rejects_garbage() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            tenant_id: Uuid::new_v4().to_string(),
            role: "admin".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
            token_type: TokenType::Access,
        };
        assert!(matches!(extract_identity(&claims), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_unique_jti_per_token() {
        let config = create_test_config();
        let identity = test_identity();

        let (_, jti1) = config.generate_access_token(identity, "admin").unwrap();
        let (_, jti2) = config.generate_access_token(identity, "admin").unwrap();

        assert_ne!(jti1, jti2, "Each token should have unique jti");
    }

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenType::Access).unwrap(),
            "\"access\""
        );
        assert_eq!(
            serde_json::to_string(&TokenType::Refresh).unwrap(),
            "\"refresh\""
        );
    }
}
