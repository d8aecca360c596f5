use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Data errors – raised while loading / validating a launch table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: 'class' must be 0 or 1, got {value}")]
    InvalidOutcome { row: usize, value: String },

    #[error("row {row}: payload mass '{value}' is not a finite number")]
    InvalidPayload { row: usize, value: String },

    #[error("row {row}: column '{column}' is empty")]
    EmptyField { row: usize, column: String },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// API errors – rendered as JSON by the HTTP handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid query parameter '{name}': {reason}")]
    BadParameter { name: &'static str, reason: String },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadParameter { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::warn!("request rejected ({status}): {self}");
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_parameter_maps_to_400() {
        let err = ApiError::BadParameter {
            name: "low",
            reason: "not a number".into(),
        };
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn data_error_messages_name_the_row() {
        let err = DataError::InvalidOutcome {
            row: 7,
            value: "2".into(),
        };
        assert_eq!(err.to_string(), "row 7: 'class' must be 0 or 1, got 2");
    }
}
