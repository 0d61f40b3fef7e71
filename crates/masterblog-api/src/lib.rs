use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// -------------------------
// Response Bodies
// -------------------------

/// JSON body for error responses: `{"error": "..."}`.
///
/// Every non-2xx response carries this shape; the `error` text is exactly
/// what the failing layer reported, without any status prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// JSON body for confirmation responses: `{"message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod body_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_body_serializes_to_error_key() {
        let body = ErrorBody::new("Post not found");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "Post not found"})
        );
    }

    #[test]
    fn message_body_serializes_to_message_key() {
        let body = MessageBody::new("Post with id 1 has been deleted successfully.");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"message": "Post with id 1 has been deleted successfully."})
        );
    }
}

// -------------------------
// API Errors
// -------------------------

/// High-level API errors to be mapped to HTTP responses with an `ErrorBody`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn unsupported_media_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedMediaType(msg.into())
    }
    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::PayloadTooLarge(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The wire body for this error, carrying the raw message without the
    /// status prefix that `Display` adds for logs.
    pub fn to_error_body(&self) -> ErrorBody {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::UnsupportedMediaType(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Internal(msg) => ErrorBody::new(msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match serde_json::to_vec(&self.to_error_body()) {
            Ok(b) => b,
            Err(_) => {
                // Fallback minimal body if serialization fails
                let fallback = ErrorBody::new("Serialization failure");
                serde_json::to_vec(&fallback).unwrap_or_else(|_| b"{}".to_vec())
            }
        };

        let mut builder = axum::http::Response::builder().status(status);
        builder = builder.header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        builder
            .body(axum::body::Body::from(body))
            .unwrap_or_else(|_| {
                axum::http::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )
                    .body(axum::body::Body::from("{}"))
                    .expect("build fallback response")
            })
    }
}


// -------------------------
// API Response Wrapper
// -------------------------

/// Name of the header carrying the total number of matching posts.
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub value: T,
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl<T> ApiResponse<T> {
    pub fn new(value: T, status: StatusCode) -> Self {
        Self {
            value,
            status,
            headers: Vec::new(),
        }
    }

    pub fn ok(value: T) -> Self {
        Self::new(value, StatusCode::OK)
    }

    pub fn created(value: T) -> Self {
        Self::new(value, StatusCode::CREATED)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Attach an `X-Total-Count` header to the response.
    pub fn with_total_count(self, total: usize) -> Self {
        match HeaderValue::from_str(&total.to_string()) {
            Ok(value) => self.with_header(TOTAL_COUNT_HEADER, value),
            Err(_) => self,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self.value) {
            Ok(b) => b,
            Err(_) => serde_json::to_vec(&ErrorBody::new("Serialization failure"))
                .unwrap_or_else(|_| b"{}".to_vec()),
        };
        let mut builder = axum::http::Response::builder().status(self.status);
        builder = builder.header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (n, v) in self.headers.into_iter() {
            builder = builder.header(n, v);
        }
        builder
            .body(axum::body::Body::from(body))
            .unwrap_or_else(|_| {
                axum::http::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )
                    .body(axum::body::Body::from("{}"))
                    .expect("build fallback response")
            })
    }
}


// -------------------------
// Content Negotiation
// -------------------------

/// Validate the Accept header for JSON responses: allow application/json,
/// */* or an absent header.
pub fn validate_accept(headers: &HeaderMap) -> Result<(), ApiError> {
    if let Some(accept) = headers.get(header::ACCEPT) {
        let val = accept.to_str().unwrap_or("").to_ascii_lowercase();
        let allowed = val.contains("application/json") || val.contains("*/*");
        if !allowed {
            return Err(ApiError::unsupported_media_type(format!(
                "Unsupported Accept: {val}. Only application/json is supported."
            )));
        }
    }
    Ok(())
}

/// Validate Content-Type for requests with bodies: require application/json.
///
/// Unlike [`validate_accept`], a missing header is rejected here; callers
/// only invoke this for methods that carry a body.
pub fn validate_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    match headers.get(header::CONTENT_TYPE) {
        Some(ct) => {
            let val = ct.to_str().unwrap_or("").to_ascii_lowercase();
            if val.starts_with("application/json") {
                Ok(())
            } else {
                Err(ApiError::unsupported_media_type(format!(
                    "Unsupported Content-Type: {val}. Only application/json is supported."
                )))
            }
        }
        None => Err(ApiError::unsupported_media_type(
            "Missing Content-Type. Only application/json is supported.",
        )),
    }
}
