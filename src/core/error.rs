use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::shared::types::ApiResponse;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// Postgres SQLSTATE for numeric_value_out_of_range
const NUMERIC_OUT_OF_RANGE: &str = "22003";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Field-level validation failure, one `field: message` entry per problem
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// Single field validation failure
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![format!("{}: {}", field, message.into())])
    }

    /// Map constraint violations and numeric overflow to client errors,
    /// everything else stays a database error
    pub fn from_db(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db) = e {
            match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return AppError::Conflict(conflict_message.to_string()),
                Some(FOREIGN_KEY_VIOLATION) => {
                    return AppError::Conflict(conflict_message.to_string())
                }
                Some(NUMERIC_OUT_OF_RANGE) => {
                    return AppError::BadRequest("A numeric value is out of range.".to_string())
                }
                _ => {}
            }
        }
        AppError::Database(e)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        flatten_validation_errors(&errors, None, &mut messages);
        messages.sort();
        AppError::Validation(messages)
    }
}

/// Walk nested validation errors and produce `path: message` strings
fn flatten_validation_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(items) => {
                for item in items {
                    let message = item
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("is invalid ({})", item.code));
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                flatten_validation_errors(inner, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let indexed = format!("{}.{}", path, index);
                    flatten_validation_errors(inner, Some(&indexed), out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::Migration(ref e) => {
                tracing::error!("Migration error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "The given data was invalid".to_string(),
                Some(errors),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::PayloadTooLarge(ref msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Inner {
        #[validate(length(min = 1, message = "Size name is required."))]
        size_name: String,
    }

    #[derive(Debug, Validate)]
    struct Outer {
        #[validate(length(min = 1, message = "Title is required."))]
        title: String,
        #[validate(nested)]
        sizes: Vec<Inner>,
    }

    #[test]
    fn test_validation_errors_are_flattened_per_field() {
        let outer = Outer {
            title: String::new(),
            sizes: vec![
                Inner {
                    size_name: "A4".to_string(),
                },
                Inner {
                    size_name: String::new(),
                },
            ],
        };

        let err: AppError = outer.validate().unwrap_err().into();
        match err {
            AppError::Validation(messages) => {
                assert_eq!(
                    messages,
                    vec![
                        "sizes.1.size_name: Size name is required.".to_string(),
                        "title: Title is required.".to_string(),
                    ]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_maps_to_unprocessable_entity() {
        let response = AppError::field("title", "Product title is required.").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_forbidden_and_unauthorized_status() {
        assert_eq!(
            AppError::Forbidden("Unauthorized access".into())
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Unauthorized("Authentication required".into())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
