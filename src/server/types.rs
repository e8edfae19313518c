use crate::{Error, ErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct EstimateQuery {
    #[serde(default)]
    pub car_name: Option<String>,
    #[serde(default)]
    pub car_model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Handler-boundary wrapper turning crate errors into `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Input => StatusCode::BAD_REQUEST,
            ErrorKind::Transport => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Upstream | ErrorKind::LocalIo | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            detail: self.0.to_string(),
        });

        (status, body).into_response()
    }
}
