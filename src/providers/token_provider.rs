use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use jsonwebtoken::errors::ErrorKind;

use crate::config::{MIN_JWT_SECRET_BYTES, SecretManager};
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::auth::Claims;

/// A freshly signed token and its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Issues and validates HS256 JWTs
///
/// A token is valid strictly before its `exp`; at `now >= exp` it is
/// expired. No leeway is applied.
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_expiry: Duration,
}

impl TokenProvider {
    /// Create a TokenProvider from the loaded secrets
    pub fn new(secret_manager: &SecretManager, default_expiry: Duration) -> Result<Self, InternalError> {
        Self::from_secret(secret_manager.jwt_secret().as_bytes(), default_expiry)
    }

    /// Create a TokenProvider from a raw signing key
    ///
    /// # Errors
    /// `CredentialError::WeakSigningKey` when the key is shorter than 256 bits
    pub fn from_secret(secret: &[u8], default_expiry: Duration) -> Result<Self, InternalError> {
        if secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(CredentialError::WeakSigningKey {
                min_bytes: MIN_JWT_SECRET_BYTES,
                actual: secret.len(),
            }
            .into());
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            default_expiry,
        })
    }

    pub fn default_expiry(&self) -> Duration {
        self.default_expiry
    }

    /// Issue a token for `subject` with the configured expiry
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, InternalError> {
        self.issue_at(subject, self.default_expiry, Utc::now().timestamp())
    }

    /// Issue a token for `subject` valid for `expiry` from `now` (Unix seconds)
    pub fn issue_at(&self, subject: &str, expiry: Duration, now: i64) -> Result<IssuedToken, InternalError> {
        let lifetime = i64::try_from(expiry.as_secs())
            .map_err(|e| InternalError::parse("token expiry", e.to_string()))?;
        let expires_at = now
            .checked_add(lifetime)
            .ok_or_else(|| InternalError::parse("token expiry", format!("{} + {} overflows", now, lifetime)))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: expires_at,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at,
        })
    }

    /// Validate signature and expiry against the current wall clock
    pub fn validate(&self, token: &str) -> Result<Claims, InternalError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate signature and expiry against `now` (Unix seconds)
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, InternalError> {
        let claims = self.decode_verified(token)?;

        if now >= claims.exp {
            tracing::debug!("Rejected expired token for {}", claims.sub);
            return Err(CredentialError::ExpiredToken("jwt".to_string()).into());
        }

        Ok(claims)
    }

    /// Return the subject of a correctly signed token without checking expiry
    pub fn extract_subject(&self, token: &str) -> Result<String, InternalError> {
        Ok(self.decode_verified(token)?.sub)
    }

    /// Verify the signature only; expiry is compared by the callers
    fn decode_verified(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature => "invalid signature",
                    _ => "malformed",
                };
                InternalError::from(CredentialError::invalid_token("jwt", reason))
            })
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("signing_key", &"<redacted>")
            .field("default_expiry", &self.default_expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-minimum-32-characters-long";

    fn provider() -> TokenProvider {
        TokenProvider::from_secret(SECRET, Duration::from_secs(900)).unwrap()
    }

    #[test]
    fn test_short_key_is_rejected() {
        let err = TokenProvider::from_secret(b"short-key", Duration::from_secs(60)).unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::WeakSigningKey { min_bytes: 32, actual: 9 })
        ));
    }

    #[test]
    fn test_issue_then_validate_returns_subject() {
        let provider = provider();
        let issued = provider.issue("ana@example.com").unwrap();

        let claims = provider.validate(&issued.token).unwrap();
        assert_eq!(claims.sub, "ana@example.com");
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(issued.expires_at, claims.exp);
    }

    #[test]
    fn test_valid_strictly_before_expiry() {
        let provider = provider();
        let now = 1_700_000_000;
        let issued = provider.issue_at("ana@example.com", Duration::from_secs(60), now).unwrap();

        assert!(provider.validate_at(&issued.token, now).is_ok());
        assert!(provider.validate_at(&issued.token, issued.expires_at - 1).is_ok());
    }

    #[test]
    fn test_invalid_at_and_after_expiry() {
        let provider = provider();
        let now = 1_700_000_000;
        let issued = provider.issue_at("ana@example.com", Duration::from_secs(60), now).unwrap();

        for instant in [issued.expires_at, issued.expires_at + 1, issued.expires_at + 3600] {
            let err = provider.validate_at(&issued.token, instant).unwrap_err();
            assert!(matches!(err, InternalError::Credential(CredentialError::ExpiredToken(_))));
        }
    }

    #[test]
    fn test_signature_mismatch_is_invalid() {
        let issuer = TokenProvider::from_secret(b"another-secret-key-that-is-32-bytes!!", Duration::from_secs(60)).unwrap();
        let issued = issuer.issue("ana@example.com").unwrap();

        let err = provider().validate(&issued.token).unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidToken { .. })));
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let err = provider().validate("not-a-jwt").unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidToken { .. })));
    }

    #[test]
    fn test_extract_subject_ignores_expiry() {
        let provider = provider();
        let issued = provider.issue_at("old@example.com", Duration::from_secs(1), 1_000).unwrap();

        assert!(provider.validate(&issued.token).is_err());
        assert_eq!(provider.extract_subject(&issued.token).unwrap(), "old@example.com");
    }

    #[test]
    fn test_extract_subject_still_checks_signature() {
        let issuer = TokenProvider::from_secret(b"another-secret-key-that-is-32-bytes!!", Duration::from_secs(60)).unwrap();
        let issued = issuer.issue("ana@example.com").unwrap();

        assert!(provider().extract_subject(&issued.token).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", provider());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("test-secret-key"));
    }
}
