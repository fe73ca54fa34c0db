use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Rejections raised by the attendance and leave rules.
///
/// Every message is safe to show to the caller. Storage failures are logged
/// where they happen and surface only as `Internal`.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum HrError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn,

    #[display(fmt = "Already checked out today")]
    AlreadyCheckedOut,

    #[display(fmt = "No active check-in found for today")]
    NotCheckedIn,

    #[display(fmt = "Leave request already processed")]
    AlreadyProcessed,

    #[display(fmt = "Leave has already started and can no longer be cancelled")]
    LeaveAlreadyStarted,

    #[display(fmt = "Internal Server Error")]
    Internal,
}

impl std::error::Error for HrError {}

impl HrError {
    pub fn validation(msg: impl Into<String>) -> Self {
        HrError::Validation(msg.into())
    }
}

impl ResponseError for HrError {
    fn status_code(&self) -> StatusCode {
        match self {
            HrError::Validation(_) | HrError::NotCheckedIn => StatusCode::BAD_REQUEST,
            HrError::NotFound(_) => StatusCode::NOT_FOUND,
            HrError::AlreadyCheckedIn
            | HrError::AlreadyCheckedOut
            | HrError::AlreadyProcessed
            | HrError::LeaveAlreadyStarted => StatusCode::CONFLICT,
            HrError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

/// Logs a storage error with its context and collapses it to `Internal`.
pub fn internal(context: &'static str, err: impl std::fmt::Display) -> HrError {
    tracing::error!(error = %err, "{}", context);
    HrError::Internal
}
