//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;
use crate::synthesis::SynthesisError;
use crate::wizard::WizardError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Action not allowed in the session's current stage
    Conflict { message: String, details: String },
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Conflict { message, details } => (
                StatusCode::CONFLICT,
                ApiError::new("CONFLICT", message).with_details(details),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        let message = err.to_string();
        match err {
            WizardError::InvalidTransition { from, .. } => AppError::Conflict {
                message,
                details: format!("current stage: {}", from),
            },
            WizardError::Unanswered { index } => AppError::Conflict {
                message,
                details: format!("answer question {} first", index),
            },
            WizardError::StaleSearch => AppError::Conflict {
                message,
                details: "a newer search replaced this one".to_string(),
            },
            WizardError::QuestionOutOfRange { .. } => AppError::BadRequest(message),
            WizardError::Synthesis(_) => AppError::BadRequest(message),
            WizardError::MissingCandidate => AppError::Internal(message),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => AppError::NotFound(err.to_string()),
            CatalogError::Empty => AppError::NotFound(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{WizardAction, WizardStage};

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_wizard_error_status() {
        assert_eq!(
            status_of(WizardError::InvalidTransition {
                from: WizardStage::Search,
                action: WizardAction::Advance,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(WizardError::Unanswered { index: 0 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(WizardError::QuestionOutOfRange { index: 9, len: 4 }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_synthesis_error_is_bad_request() {
        assert_eq!(
            status_of(SynthesisError::invalid("period_days", "must be > 0")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_catalog_not_found() {
        assert_eq!(
            status_of(CatalogError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
    }
}
