use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::dto::switch_dto::ErrorResponse;
use crate::services::team_switcher::{ModeError, SwitchError};

/// Every failure a handler can surface, mapped to its HTTP status in one place.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    InvalidMode,
    Upstream(String),
    Internal(String),
}

impl From<ModeError> for ApiError {
    fn from(_: ModeError) -> Self {
        ApiError::InvalidMode
    }
}

impl From<SwitchError> for ApiError {
    fn from(e: SwitchError) -> Self {
        match e {
            SwitchError::Rejected { .. } => {
                error!("{}", e);
                ApiError::Upstream(e.to_string())
            }
            SwitchError::Transport(ref source) => {
                error!("Switch failed: {:?}", source);
                ApiError::Internal("Unexpected error while contacting Aircall".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Unauthorized => {
                let body = Json(ErrorResponse {
                    detail: "Unauthorized".to_string(),
                });
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Basic")],
                    body,
                )
                    .into_response();
            }
            ApiError::InvalidMode => (StatusCode::BAD_REQUEST, "Invalid mode".to_string()),
            ApiError::Upstream(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
