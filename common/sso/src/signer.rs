use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::claims::Claims;
use crate::error::{SignerError, SsoError, SsoResult};

/// Turns claims into a signed token using the account's shared secret.
pub trait ClaimsSigner: Send + Sync {
    fn encode(&self, claims: &Claims, secret: &str) -> Result<String, SignerError>;
}

/// Default signer: compact JWS over the claims, HMAC keyed by the shared secret.
#[derive(Debug, Clone)]
pub struct HmacSigner {
    algorithm: Algorithm,
}

impl HmacSigner {
    pub fn new(algorithm: Algorithm) -> SsoResult<Self> {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(Self { algorithm }),
            other => Err(SsoError::UnsupportedAlgorithm(format!("{other:?}"))),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl Default for HmacSigner {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
        }
    }
}

impl ClaimsSigner for HmacSigner {
    fn encode(&self, claims: &Claims, secret: &str) -> Result<String, SignerError> {
        let header = Header::new(self.algorithm);
        let key = EncodingKey::from_secret(secret.as_bytes());
        Ok(encode(&header, claims, &key)?)
    }
}
