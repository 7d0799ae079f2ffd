use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl HttpError {
    pub fn code(&self) -> &'static str {
        match self {
            HttpError::BadRequest(_) => "validation_error",
            HttpError::Unauthorized(_) => "unauthorized",
            HttpError::NotFound(_) => "not_found",
            HttpError::Conflict(_) => "conflict",
            HttpError::TooManyRequests(_) => "rate_limited",
            HttpError::ServiceUnavailable(_) => "service_unavailable",
            HttpError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            HttpError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Server-side failures are logged here and replaced with a generic message.
impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => {
                HttpError::BadRequest(format!("Validation failed: {}", errors.join("; ")))
            }

            ServiceError::NotFound(msg) => HttpError::NotFound(msg),

            ServiceError::Repo(RepositoryError::NotFound) => HttpError::NotFound("Not found".into()),

            ServiceError::Conflict(msg) => HttpError::Conflict(msg),

            ServiceError::InvalidCredentials => {
                HttpError::Unauthorized("Invalid credentials".into())
            }

            ServiceError::Jwt(_) => HttpError::Unauthorized("Invalid token".into()),

            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".into()),

            ServiceError::InvalidTokenType => HttpError::Unauthorized("Invalid token type".into()),

            other => {
                error!("❌ Internal failure surfaced to HTTP layer: {other}");
                HttpError::Internal("Internal server error".into())
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().to_string();

        let message = match self {
            HttpError::BadRequest(msg)
            | HttpError::Unauthorized(msg)
            | HttpError::NotFound(msg)
            | HttpError::Conflict(msg)
            | HttpError::TooManyRequests(msg)
            | HttpError::ServiceUnavailable(msg)
            | HttpError::Internal(msg) => msg,
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            code,
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = HttpError::from(ServiceError::Validation(vec!["items: empty".into()]));

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn not_found_has_its_own_code() {
        let err = HttpError::from(ServiceError::NotFound("Order not found".into()));

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn store_errors_do_not_leak_detail() {
        let err = HttpError::from(ServiceError::Repo(RepositoryError::ForeignKey(
            "orders_user_id_fkey".into(),
        )));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            HttpError::Internal(msg) => assert!(!msg.contains("orders_user_id_fkey")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn timeouts_are_server_failures() {
        let err = HttpError::from(ServiceError::Repo(RepositoryError::Timeout(5000)));

        assert_eq!(err.code(), "internal_error");
    }
}
