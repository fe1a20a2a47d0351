// HTTP error responses
use crate::application::carlos_api::ApiError;
use crate::application::dashboard_service::DashboardError;
use crate::domain::timeseries::TimeseriesError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApiError> for HttpError {
    fn from(e: ApiError) -> Self {
        let status = match &e {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Transport { .. } | ApiError::Status { .. } | ApiError::Decode { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self::new(status, e.to_string())
    }
}

impl From<DashboardError> for HttpError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::Api(e) => e.into(),
            DashboardError::Timeseries(e @ TimeseriesError::InvalidRange(_)) => {
                Self::bad_request(e.to_string())
            }
            // malformed series from upstream
            DashboardError::Timeseries(e) => Self::new(StatusCode::BAD_GATEWAY, e.to_string()),
            DashboardError::Gradient(e) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), error = %self.message, "request failed");
        } else {
            tracing::debug!(status = self.status.as_u16(), error = %self.message, "request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
