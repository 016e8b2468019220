use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paywall_derive::api_model;
use std::borrow::Cow;

/// Body of every non-2xx response that carries a message.
#[api_model]
pub struct ErrorResponse {
    pub message: String,
}

/// Errors a handler can answer with.
///
/// Expected outcomes (missing records, no login, exhausted quota) map to 4xx codes with a
/// short message. Everything else is logged and answered with 500.
#[paywall_derive::paywall_error]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The request body or an extractor was refused before the handler ran.
    #[error("Rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No user is bound to the session. Answered with an empty JSON object.
    #[error("Unauthenticated{}", format_context(.context))]
    Unauthenticated { context: Option<Cow<'static, str>> },

    #[error("Internal server error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } | Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Rejected { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text().into(),
            context: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            Self::NotFound { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Rejected { message, .. } => {
                (status, Json(ErrorResponse { message: message.into_owned() })).into_response()
            },
            Self::Unauthenticated { .. } => {
                (status, Json(serde_json::Map::<String, serde_json::Value>::new())).into_response()
            },
            Self::Internal { .. } => {
                tracing::error!(error = %self, "Request failed");
                (status, Json(ErrorResponse { message: "Internal server error".to_owned() }))
                    .into_response()
            },
        }
    }
}
