use std::convert::Infallible;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::claims::{ClaimValue, Claims, SsoOptions};
use crate::config::SsoConfig;
use crate::error::{SsoError, SsoResult};
use crate::redirect::{location_header, CgiHeader, HeaderSink, ProcessExit, Terminate};
use crate::response::SsoRedirect;
use crate::signer::{ClaimsSigner, HmacSigner};

/// Builds signed Zendesk SSO URLs for one account.
#[derive(Clone)]
pub struct TokenUrlBuilder {
    config: SsoConfig,
    signer: Arc<dyn ClaimsSigner>,
}

impl TokenUrlBuilder {
    /// Builder signing with the default [`HmacSigner`] for the configured algorithm.
    pub fn new(config: SsoConfig) -> SsoResult<Self> {
        let signer = HmacSigner::new(config.algorithm())?;
        Ok(Self::with_signer(config, Arc::new(signer)))
    }

    pub fn with_signer(config: SsoConfig, signer: Arc<dyn ClaimsSigner>) -> Self {
        Self { config, signer }
    }

    pub fn config(&self) -> &SsoConfig {
        &self.config
    }

    /// Validate the user and options and build the claims to sign, issued now.
    pub fn build_claims(
        &self,
        name: impl Into<ClaimValue>,
        email: impl Into<ClaimValue>,
        options: &SsoOptions,
    ) -> SsoResult<Claims> {
        self.build_claims_at(name, email, options, Utc::now())
    }

    pub fn build_claims_at(
        &self,
        name: impl Into<ClaimValue>,
        email: impl Into<ClaimValue>,
        options: &SsoOptions,
        issued_at: DateTime<Utc>,
    ) -> SsoResult<Claims> {
        Claims::build(name.into(), email.into(), options, issued_at).map_err(|err| {
            warn!(subdomain = %self.config.subdomain(), error = %err, "rejected SSO input");
            SsoError::from(err)
        })
    }

    /// Sign the claims and return the hosted login URL.
    ///
    /// `return_to` must be a fully qualified URL and must not be pre-encoded.
    pub fn build_url(
        &self,
        name: impl Into<ClaimValue>,
        email: impl Into<ClaimValue>,
        return_to: Option<&str>,
        options: Option<&SsoOptions>,
    ) -> SsoResult<String> {
        let empty = SsoOptions::new();
        let claims = self.build_claims(name, email, options.unwrap_or(&empty))?;
        let token = self
            .signer
            .encode(&claims, self.config.shared_secret())
            .map_err(SsoError::Signer)?;

        let mut url = format!("{}?jwt={}", self.config.endpoint(), token);
        let return_to = return_to.filter(|value| !value.is_empty());
        if let Some(target) = return_to {
            url.push_str("&return_to=");
            url.push_str(&urlencoding::encode(target));
        }

        debug!(
            subdomain = %self.config.subdomain(),
            jti = claims.jti(),
            has_return_to = return_to.is_some(),
            "built SSO url"
        );
        Ok(url)
    }

    /// Send `Location: <url>` through `header`, then hand control to `terminate`.
    pub fn redirect_to<H, T>(
        &self,
        name: impl Into<ClaimValue>,
        email: impl Into<ClaimValue>,
        return_to: Option<&str>,
        options: Option<&SsoOptions>,
        header: &H,
        terminate: &T,
    ) -> SsoResult<T::Output>
    where
        H: HeaderSink + ?Sized,
        T: Terminate + ?Sized,
    {
        let url = self.build_url(name, email, return_to, options)?;
        header.send_header(&location_header(&url));
        Ok(terminate.terminate())
    }

    /// Redirect from a CGI-style process: print the header and exit.
    pub fn redirect_to_default(
        &self,
        name: impl Into<ClaimValue>,
        email: impl Into<ClaimValue>,
        return_to: Option<&str>,
        options: Option<&SsoOptions>,
    ) -> SsoResult<Infallible> {
        self.redirect_to(name, email, return_to, options, &CgiHeader, &ProcessExit)
    }

    /// Redirect response for use from an axum handler.
    pub fn redirect_response(
        &self,
        name: impl Into<ClaimValue>,
        email: impl Into<ClaimValue>,
        return_to: Option<&str>,
        options: Option<&SsoOptions>,
    ) -> SsoResult<SsoRedirect> {
        self.build_url(name, email, return_to, options)
            .map(SsoRedirect::new)
    }
}
