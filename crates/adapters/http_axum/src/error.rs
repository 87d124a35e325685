//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use controlhub_domain::error::{ControlHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

/// Maps [`ControlHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(ControlHubError);

impl From<ControlHubError> for ApiError {
    fn from(err: ControlHubError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            ControlHubError::Validation(_) => StatusCode::BAD_REQUEST,
            ControlHubError::NotFound(_) => StatusCode::NOT_FOUND,
            ControlHubError::Conflict(err) if err.is_duplicate() => StatusCode::CONFLICT,
            ControlHubError::Conflict(_) => StatusCode::BAD_REQUEST,
            ControlHubError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ControlHubError::Storage(err) = &self.0 {
            tracing::error!(error = %err, "storage error");
        } else {
            tracing::debug!(%status, error = %self.0, "request rejected");
        }

        let body = ErrorBody {
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use controlhub_domain::error::{ConflictError, NotFoundError};

    fn status_of(err: impl Into<ControlHubError>) -> StatusCode {
        ApiError::from(err.into()).into_response().status()
    }

    #[test]
    fn should_map_error_kinds_to_status_codes() {
        assert_eq!(
            status_of(ValidationError::NothingToUpdate),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(NotFoundError::ScriptTarget {
                name: "missing".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ControlHubError::Storage("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn should_split_conflicts_between_409_and_400() {
        assert_eq!(
            status_of(ConflictError::DuplicateScript {
                name: "a".to_string()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ConflictError::AclInUse {
                acl: "a".to_string(),
                script: "b".to_string()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ConflictError::ScheduleAlreadyExists {
                name: "a".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ConflictError::CategoryAlreadyExists {
                name: "a".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ConflictError::ProxyAlreadyConfigured {
                service: "a".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
    }
}
