use std::borrow::Cow;
use std::collections::BTreeMap;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("image not found: {0}")]
    ImageNotFound(Uuid),
    #[error("The given data was invalid.")]
    Validation(#[from] ValidationErrors),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("This action is unauthorized.")]
    Forbidden,
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// A body that could not be decoded, reported under the `payload` key.
    pub fn malformed(detail: String) -> Self {
        let mut error = ValidationError::new("malformed");
        error.message = Some(Cow::Owned(detail));
        let mut errors = ValidationErrors::new();
        errors.add("payload", error);
        DomainError::Validation(errors)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    message: &'a str,
    errors: BTreeMap<String, Vec<String>>,
}

/// Flattens validator output into `field -> [message, ...]`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid.", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::PostNotFound(_)
            | DomainError::ImageNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();

        if let DomainError::Validation(errors) = self {
            return HttpResponse::build(self.status_code()).json(ValidationBody {
                message: message.as_str(),
                errors: field_messages(errors),
            });
        }

        let details = match self {
            DomainError::PostNotFound(resource)
            | DomainError::ImageNotFound(resource)
            | DomainError::UserNotFound(resource) => Some(json!({ "resource": resource })),
            DomainError::Internal(cause) => {
                error!(cause = %cause, "request failed with internal error");
                None
            }
            _ => None,
        };
        let error = match self {
            // the cause is logged above, never sent to the client
            DomainError::Internal(_) => "internal server error",
            _ => message.as_str(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error, details })
    }
}
