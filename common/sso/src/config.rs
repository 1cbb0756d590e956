use std::fmt;

use jsonwebtoken::Algorithm;
use zeroize::Zeroizing;

/// Account settings for Zendesk JWT single sign-on.
#[derive(Clone)]
pub struct SsoConfig {
    /// Zendesk account identifier, the `<subdomain>` in `<subdomain>.zendesk.com`.
    subdomain: String,
    /// Shared secret from the Zendesk SSO admin page.
    shared_secret: Zeroizing<String>,
    /// HMAC algorithm used by the default signer.
    algorithm: Algorithm,
}

impl SsoConfig {
    /// Construct config with the default HS256 algorithm.
    pub fn new(subdomain: impl Into<String>, shared_secret: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
            shared_secret: Zeroizing::new(shared_secret.into()),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    pub fn shared_secret(&self) -> &str {
        self.shared_secret.as_str()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Hosted login endpoint the signed token is delivered to.
    pub fn endpoint(&self) -> String {
        format!("https://{}.zendesk.com/access/jwt", self.subdomain)
    }
}

impl fmt::Debug for SsoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SsoConfig")
            .field("subdomain", &self.subdomain)
            .field("shared_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
