//! Signed Zendesk single sign-on URLs.
//!
//! [`TokenUrlBuilder`] validates a user's name, email and optional attributes,
//! signs them as a JWT with the account's shared secret and returns the
//! `https://<subdomain>.zendesk.com/access/jwt` URL that logs the user in.

pub mod builder;
pub mod claims;
pub mod config;
pub mod error;
pub mod fields;
pub mod redirect;
pub mod response;
pub mod signer;

pub use builder::TokenUrlBuilder;
pub use claims::{ClaimValue, Claims, SsoOptions};
pub use config::SsoConfig;
pub use error::{InvalidInput, SignerError, SsoError, SsoResult};
pub use fields::{OptionalField, OPTIONAL_FIELDS};
pub use redirect::{CgiHeader, HeaderSink, ProcessExit, Terminate};
pub use response::SsoRedirect;
pub use signer::{ClaimsSigner, HmacSigner};
