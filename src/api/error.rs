use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::spoonacular::SpoonacularError;

use super::models::ErrorResponse;

pub const UNAUTHORIZED_DETAIL: &str = "Unauthorized: missing or invalid Spoonacular API key. Please set SPOONACULAR_API_KEY in backend .env.";

/// Every failure a handler can produce. Each one renders as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Spoonacular(#[from] SpoonacularError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Spoonacular(e) if e.is_auth_error() => StatusCode::UNAUTHORIZED,
            Self::Spoonacular(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
            Self::MethodNotAllowed => self.to_string(),
            Self::Spoonacular(e) if e.is_auth_error() => UNAUTHORIZED_DETAIL.to_string(),
            Self::Spoonacular(e) => format!("Spoonacular error: {e}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("upstream failure: {:#}", self);
        } else {
            log::info!("request rejected ({status}): {self}");
        }
        (
            status,
            Json(ErrorResponse {
                detail: self.detail(),
            }),
        )
            .into_response()
    }
}
