//! Error type shared by the composer, the policy compiler and the middleware.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::config::RemovedCapability;

/// Boxed error returned by dynamic directive sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while building or applying security headers.
///
/// Everything except [`HelmetError::InvalidDirectiveValue`] and
/// [`HelmetError::DirectiveSource`] is a configuration error and is only ever
/// returned while the middleware is being constructed.
#[derive(Debug, thiserror::Error)]
pub enum HelmetError {
    #[error(
        "It appears you passed a request where helmet options were expected. Build the middleware first with `Helmet::new(options)?` and register that with `App::wrap`."
    )]
    Misuse,

    #[error("helmet options must be a mapping of capability names, got {0}")]
    NotAMapping(&'static str),

    #[error("helmet received an unknown option \"{0}\"")]
    UnknownCapability(String),

    #[error("{}", .0.message())]
    RemovedCapability(RemovedCapability),

    #[error("{header} {message}")]
    InvalidOption {
        header: &'static str,
        message: String,
    },

    #[error("{header} received an invalid directive name \"{name}\"")]
    InvalidDirectiveName { header: &'static str, name: String },

    #[error("{header} received an invalid directive value for \"{directive}\"")]
    InvalidDirectiveValue {
        header: &'static str,
        directive: String,
    },

    #[error("{header} could not resolve a value for \"{directive}\": {source}")]
    DirectiveSource {
        header: &'static str,
        directive: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid helmet options: {0}")]
    Json(#[from] serde_json::Error),
}

impl HelmetError {
    pub(crate) fn invalid_option(header: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            header,
            message: message.into(),
        }
    }

    /// Whether this error can only occur while handling a request.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDirectiveValue { .. } | Self::DirectiveSource { .. }
        )
    }
}

impl ResponseError for HelmetError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
