//! HTTP error responses.
//!
//! Every failure leaves the API as `{"error": "<CODE>", "message": "..."}`.
//! Repository errors convert into [`ApiError`] so handlers can use `?`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use shootlogix_db::repositories::{
    AssignmentError, BudgetLineError, FnbError, FunctionError, GuardError, HistoryError,
    MembershipError, ProductionError, ResourceError, ScheduleError, ShootingDayError,
};
use shootlogix_shared::AppError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error response with a status, a machine-readable code and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Upper-case error code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 400 with `VALIDATION_ERROR`.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    /// 401 with a specific code.
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    /// 403 with `FORBIDDEN`.
    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into()).into()
    }

    /// 404 with `NOT_FOUND`.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into()).into()
    }

    /// 409 with `CONFLICT`.
    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into()).into()
    }

    /// 500 with `INTERNAL_ERROR`. Details are logged, never returned.
    pub fn internal(details: impl std::fmt::Display) -> Self {
        AppError::Internal(details.to_string()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %e, "Request failed");
        }
        Self {
            status,
            code: e.error_code(),
            message: e.public_message(),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        AppError::Database(e.to_string()).into()
    }
}

impl From<ProductionError> for ApiError {
    fn from(e: ProductionError) -> Self {
        let message = e.to_string();
        match e {
            ProductionError::NameRequired | ProductionError::InvalidStatus(_) => {
                AppError::Validation(message)
            }
            ProductionError::DuplicateName(_) => AppError::Conflict(message),
            ProductionError::NotFound(_) => AppError::NotFound(message),
            ProductionError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

impl From<MembershipError> for ApiError {
    fn from(e: MembershipError) -> Self {
        let message = e.to_string();
        match e {
            MembershipError::AlreadyMember => AppError::Conflict(message),
            MembershipError::NotFound => AppError::NotFound(message),
            MembershipError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

impl From<ShootingDayError> for ApiError {
    fn from(e: ShootingDayError) -> Self {
        let message = e.to_string();
        match e {
            ShootingDayError::InvalidDate => AppError::Validation(message),
            ShootingDayError::NotFound(_) => AppError::NotFound(message),
            ShootingDayError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

impl From<FunctionError> for ApiError {
    fn from(e: FunctionError) -> Self {
        let message = e.to_string();
        match e {
            FunctionError::NameRequired => AppError::Validation(message),
            FunctionError::NotFound(_) => AppError::NotFound(message),
            FunctionError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

impl From<ResourceError> for ApiError {
    fn from(e: ResourceError) -> Self {
        let message = e.to_string();
        match e {
            ResourceError::NameRequired(_) | ResourceError::InvalidRate(_) => {
                AppError::Validation(message)
            }
            ResourceError::NotFound(_) => AppError::NotFound(message),
            ResourceError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

impl From<AssignmentError> for ApiError {
    fn from(e: AssignmentError) -> Self {
        let message = e.to_string();
        match e {
            AssignmentError::FunctionRequired
            | AssignmentError::InvalidDate(_)
            | AssignmentError::DateOrder
            | AssignmentError::InvalidOverrides(_)
            | AssignmentError::InvalidPrice(_) => AppError::Validation(message),
            AssignmentError::FunctionNotFound(_)
            | AssignmentError::ResourceNotFound(_)
            | AssignmentError::NotFound(_) => AppError::NotFound(message),
            AssignmentError::History(_) | AssignmentError::Database(_) => {
                AppError::Database(message)
            }
        }
        .into()
    }
}

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        AppError::Database(e.to_string()).into()
    }
}

impl From<ScheduleError> for ApiError {
    fn from(e: ScheduleError) -> Self {
        let message = e.to_string();
        match e {
            ScheduleError::Required(_)
            | ScheduleError::InvalidStatus(_)
            | ScheduleError::InvalidDate
            | ScheduleError::NegativeGuards
            | ScheduleError::InvalidPrice(_) => AppError::Validation(message),
            ScheduleError::Locked => AppError::Conflict(message),
            ScheduleError::NotFound(_) => AppError::NotFound(message),
            ScheduleError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

impl From<GuardError> for ApiError {
    fn from(e: GuardError) -> Self {
        let message = e.to_string();
        match e {
            GuardError::NameRequired | GuardError::InvalidRate(_) => AppError::Validation(message),
            GuardError::NotFound(_) => AppError::NotFound(message),
            GuardError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

impl From<FnbError> for ApiError {
    fn from(e: FnbError) -> Self {
        let message = e.to_string();
        match e {
            FnbError::NameRequired
            | FnbError::Required(_)
            | FnbError::InvalidEntry(_)
            | FnbError::InvalidDate => AppError::Validation(message),
            FnbError::DuplicateCategory(_) => AppError::Conflict(message),
            FnbError::CategoryNotFound(_)
            | FnbError::ItemNotFound(_)
            | FnbError::EntryNotFound(_) => AppError::NotFound(message),
            FnbError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

impl From<BudgetLineError> for ApiError {
    fn from(e: BudgetLineError) -> Self {
        let message = e.to_string();
        match e {
            BudgetLineError::Invalid(_) => AppError::Validation(message),
            BudgetLineError::DepartmentNotFound(_) | BudgetLineError::NotFound(_) => {
                AppError::NotFound(message)
            }
            BudgetLineError::Database(_) => AppError::Database(message),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shootlogix_core::budget::BudgetError;

    #[test]
    fn test_database_details_hidden() {
        let err: ApiError = DbErr::Custom("disk I/O error".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "DATABASE_ERROR");
        assert_eq!(err.message, "An internal error occurred");
    }

    #[test]
    fn test_locked_cell_is_conflict() {
        let err: ApiError = ScheduleError::Locked.into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "This day is locked");
    }

    #[test]
    fn test_duplicate_production_is_conflict() {
        let err: ApiError = ProductionError::DuplicateName("KLAS7".to_string()).into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, "CONFLICT");
        assert_eq!(err.message, "A project named 'KLAS7' already exists");
    }

    #[test]
    fn test_assignment_validation() {
        let err: ApiError = AssignmentError::DateOrder.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[rstest]
    #[case(FnbError::DuplicateCategory("DRINKS".to_string()).into(), StatusCode::CONFLICT)]
    #[case(FnbError::ItemNotFound(4).into(), StatusCode::NOT_FOUND)]
    #[case(GuardError::NameRequired.into(), StatusCode::BAD_REQUEST)]
    #[case(ScheduleError::NegativeGuards.into(), StatusCode::BAD_REQUEST)]
    #[case(BudgetLineError::DepartmentNotFound(9).into(), StatusCode::NOT_FOUND)]
    #[case(MembershipError::AlreadyMember.into(), StatusCode::CONFLICT)]
    #[case(
        ResourceError::InvalidRate(BudgetError::AmountOutOfRange("daily_rate_estimate")).into(),
        StatusCode::BAD_REQUEST
    )]
    #[case(
        AssignmentError::InvalidPrice(BudgetError::AmountOutOfRange("price_override")).into(),
        StatusCode::BAD_REQUEST
    )]
    fn test_repository_error_status(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.status, expected);
    }
}
