use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;

/// Peppered Argon2id password hashing
///
/// The pepper is passed as the Argon2 secret parameter, so stored hashes
/// are useless without it.
pub struct PasswordProvider {
    pepper: Vec<u8>,
    /// Hash verified when a login names an unknown email, so both paths cost the same
    dummy_hash: String,
}

impl PasswordProvider {
    pub fn new(pepper: &str) -> Result<Self, InternalError> {
        let mut provider = Self {
            pepper: pepper.as_bytes().to_vec(),
            dummy_hash: String::new(),
        };
        provider.dummy_hash = provider.hash_password("dummy-password-for-unknown-users")?;
        Ok(provider)
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(&self.pepper, Algorithm::Argon2id, Version::V0x13, Params::default())
            .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash
    ///
    /// An unparsable stored hash counts as a mismatch.
    pub fn verify_password(&self, stored_hash: &str, password: &str) -> Result<bool, InternalError> {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                return Ok(false);
            }
        };

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Burn one verification against the dummy hash
    pub fn verify_dummy(&self, password: &str) -> Result<(), InternalError> {
        self.verify_password(&self.dummy_hash, password).map(|_| ())
    }

    /// Generate a random 20-character password for the initial administrator
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                 abcdefghijklmnopqrstuvwxyz\
                                 0123456789\
                                 !@#$%^&*()_+-=[]{}|;:,.<>?";

        let mut rng = rand::rng();
        (0..PASSWORD_LENGTH)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }
}

impl std::fmt::Debug for PasswordProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordProvider")
            .field("pepper", &"<redacted>")
            .finish()
    }
}
