use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    InvalidBookingWindow(String),
    #[error("{0}")]
    BookingConflict(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("transaction could not be processed")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("failed to convert a stored record: {0}")]
    ConversionEntityError(String),
    #[error(transparent)]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error(transparent)]
    SerializationError(#[from] serde_json::Error),
    #[error("authentication is required")]
    UnauthenticatedError,
    #[error("the operation is not permitted for this user")]
    ForbiddenOperation,
    #[error("external service call failed: {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidBookingWindow(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::BookingConflict(_) => StatusCode::CONFLICT,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::ExternalServiceError(_) => StatusCode::SERVICE_UNAVAILABLE,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ConversionEntityError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::SerializationError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status_code.into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn user_facing_errors_map_to_4xx() {
        assert_eq!(
            status_of(AppError::InvalidBookingWindow("too soon".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::BookingConflict("room taken".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::EntityNotFound("booking".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::UnauthenticatedError),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::ForbiddenOperation),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn upstream_failure_maps_to_service_unavailable() {
        assert_eq!(
            status_of(AppError::ExternalServiceError("user service".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn infrastructure_errors_are_internal() {
        assert_eq!(
            status_of(AppError::NoRowsAffectedError("update".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
