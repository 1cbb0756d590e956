use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::fields::OPTIONAL_FIELDS;

pub type SsoResult<T> = Result<T, SsoError>;

/// Boxed error returned by a [`ClaimsSigner`](crate::signer::ClaimsSigner).
pub type SignerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Rejections raised while validating the user and building claims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("JWT name must be a string value")]
    NameNotString,
    #[error("JWT name must not be empty")]
    EmptyName,
    #[error("JWT email must be a string value")]
    EmailNotString,
    #[error("JWT email must be an email address")]
    InvalidEmail,
    #[error(
        "the following token keys are not allowed: {}. Valid optional keys are {}",
        .0.join(", "),
        OPTIONAL_FIELDS.join(", ")
    )]
    UnsupportedFields(Vec<String>),
}

#[derive(Debug, Error)]
pub enum SsoError {
    #[error("invalid SSO input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Signer(SignerError),
    #[error("signing algorithm '{0}' is not supported for shared-secret SSO")]
    UnsupportedAlgorithm(String),
}

impl SsoError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SsoError::InvalidInput(_))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for SsoError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            SsoError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "SSO_INPUT"),
            SsoError::Signer(_) | SsoError::UnsupportedAlgorithm(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SSO_INTERNAL")
            }
        };

        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
