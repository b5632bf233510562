//! Shared API types
//!
//! Maps filter failures onto the JSON error body used by the HTTP layer so
//! a route handler can `?` a parse result directly.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::filters::FilterError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        code: String,
        message: String,
        index: Option<usize>,
        field: Option<String>,
    },
    Internal {
        message: String,
    },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
            index: None,
            field: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent to the client
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::BadRequest {
                code,
                message,
                index,
                field,
            } => {
                let mut body = json!({
                    "error": "bad_request",
                    "code": code,
                    "message": message,
                });
                if let Some(index) = index {
                    body["index"] = json!(index);
                }
                if let Some(field) = field {
                    body["field"] = json!(field);
                }
                body
            }
            Self::Internal { message } => json!({
                "error": "internal_error",
                "code": "INTERNAL",
                "message": message,
            }),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        Self::BadRequest {
            code: e.code().to_string(),
            message: e.kind.to_string(),
            index: e.index,
            field: e.field,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal { message } = &self {
            tracing::error!(message = %message, "Internal error");
        }
        (self.status(), Json(self.body())).into_response()
    }
}
