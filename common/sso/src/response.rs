use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// A `302 Found` pointing the browser at a signed SSO URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsoRedirect {
    url: String,
}

impl SsoRedirect {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

impl IntoResponse for SsoRedirect {
    fn into_response(self) -> Response {
        match HeaderValue::try_from(self.url) {
            Ok(location) => (StatusCode::FOUND, [(LOCATION, location)]).into_response(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
