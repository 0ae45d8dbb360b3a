use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, Salt, SaltString,
    },
};
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;
use zeroize::Zeroizing;

/// Argon2id password hashing with an optional server-side pepper.
///
/// Hashes are PHC strings and carry their own salt and parameters, so the
/// cost settings can change without invalidating stored accounts. The pepper
/// cannot.
#[derive(Debug)]
pub struct AuthCrypto {
    argon2: Argon2<'static>,
    pepper: Zeroizing<Vec<u8>>,
}

#[derive(Debug, Error)]
pub enum AuthCryptoError {
    #[error("invalid Argon2 parameters: {0}")]
    InvalidParams(String),
    #[error("password hashing error: {0}")]
    Hash(String),
}

impl From<PasswordHashError> for AuthCryptoError {
    fn from(err: PasswordHashError) -> Self {
        AuthCryptoError::Hash(err.to_string())
    }
}

impl AuthCrypto {
    const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;
    const DEFAULT_ITERATIONS: u32 = 2;
    const DEFAULT_PARALLELISM: u32 = 1;
    const SALT_LENGTH: usize = Salt::RECOMMENDED_LENGTH;

    pub fn new(pepper: impl AsRef<[u8]>) -> Result<Self, AuthCryptoError> {
        let params = ParamsBuilder::new()
            .m_cost(Self::DEFAULT_MEMORY_KIB)
            .t_cost(Self::DEFAULT_ITERATIONS)
            .p_cost(Self::DEFAULT_PARALLELISM)
            .output_len(32)
            .build()
            .map_err(|err| AuthCryptoError::InvalidParams(err.to_string()))?;
        Ok(Self::with_params(pepper, params))
    }

    /// Cheap parameters for tests and constrained environments.
    pub fn with_params(pepper: impl AsRef<[u8]>, params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
            pepper: Zeroizing::new(pepper.as_ref().to_vec()),
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthCryptoError> {
        let material = self.peppered(password);

        let mut salt_bytes = [0u8; Self::SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| AuthCryptoError::Hash(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)?;

        Ok(self.argon2.hash_password(&material, &salt)?.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthCryptoError> {
        let parsed = PasswordHash::new(password_hash)?;
        let material = self.peppered(password);
        Ok(self.argon2.verify_password(&material, &parsed).is_ok())
    }

    fn peppered(&self, password: &str) -> Zeroizing<Vec<u8>> {
        let mut material =
            Zeroizing::new(Vec::with_capacity(password.len() + self.pepper.len()));
        material.extend_from_slice(password.as_bytes());
        material.extend_from_slice(&self.pepper);
        material
    }
}
