use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::ServiceError;

/// Maps domain errors onto the HTTP surface. Database detail is logged
/// server-side and never echoed to the client.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            ServiceError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            ServiceError::Database(err) => {
                log::error!("database failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
