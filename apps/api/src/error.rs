//! API error types and status-code mapping.
//!
//! ## Error Mapping
//! ```text
//! ValidationError (rollback, payment mismatch, bad dates)  → 422
//! NoPriceConfigured                                        → 422
//! DuplicateReading, UniqueViolation                        → 409
//! NotFound, *NotFound                                      → 404
//! everything else                                          → 500
//! ```
//!
//! Every failure is the same envelope: `{"success": false, "error": "…"}`.
//! Internal errors are logged with detail but reported to clients generically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use forecourt_core::CoreError;
use forecourt_db::DbError;

/// API request errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request was well-formed JSON but violates a domain rule.
    #[error("{0}")]
    Unprocessable(String),

    /// Request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// Referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Anything the client cannot fix.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::Validation(_) | CoreError::NoPriceConfigured { .. } => {
                ApiError::Unprocessable(err.to_string())
            }
            CoreError::DuplicateReading { .. } => ApiError::Conflict(err.to_string()),
            CoreError::StationNotFound(_)
            | CoreError::NozzleNotFound(_)
            | CoreError::EmployeeNotFound(_)
            | CoreError::SettlementNotFound { .. } => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => core.into(),
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::ForeignKeyViolation { .. } => ApiError::Unprocessable(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<forecourt_core::ValidationError> for ApiError {
    fn from(err: forecourt_core::ValidationError) -> Self {
        ApiError::Unprocessable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Client-facing message; internals stay in the log
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(detail, "internal error serving request");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_no_price_maps_to_422() {
        let err: ApiError = CoreError::NoPriceConfigured {
            station_id: "st-1".to_string(),
            fuel_type: "petrol".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_duplicate_reading_maps_to_409() {
        let err: ApiError = CoreError::DuplicateReading {
            nozzle_id: "n-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_db_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Station", "st-9").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_domain_wrap_unwraps() {
        let err: ApiError = DbError::Domain(CoreError::StationNotFound("st-9".to_string())).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_hides_detail() {
        let err: ApiError = DbError::Internal("secret pool detail".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "internal error");
    }
}
