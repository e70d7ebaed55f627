use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Authentication required.")]
    MissingAuthorizationToken,
    #[error("Invalid authentication token.")]
    InvalidTokenError,
    #[error("{0}")]
    UnauthorizedError(String),
    #[error("{0}")]
    ForbiddenError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    BusinessRuleError(String),
    #[error("{0}")]
    InvalidAddressError(String),
    #[error("Enrichment error, {0}")]
    EnrichmentError(String),
    #[error("Environment variable not set, {0}")]
    EnvironmentVariableNotSetError(String),
    #[error("File read error, {0}")]
    FileReadError(String),
    #[error("Sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("jsonwebtoken error")]
    JsonWebTokenError(#[from] jsonwebtoken::errors::Error),
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Validation errors, {0}")]
    ValidatorValidationErrors(#[from] validator::ValidationErrors),
    #[error("IO error, {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error, {0}")]
    InternalError(String),
}

/// True when the database rejected a write for breaking a unique
/// constraint (Postgres error code 23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::ValidationError(e) | Self::InvalidAddressError(e) => (StatusCode::BAD_REQUEST, e),
            Self::ValidatorValidationErrors(e) => {
                (StatusCode::BAD_REQUEST, first_validation_message(&e))
            }
            Self::MissingAuthorizationToken => {
                (StatusCode::UNAUTHORIZED, "Authentication required.".to_string())
            }
            Self::InvalidTokenError | Self::JsonWebTokenError(_) => (
                StatusCode::UNAUTHORIZED,
                "Invalid authentication token.".to_string(),
            ),
            Self::UnauthorizedError(e) => (StatusCode::UNAUTHORIZED, e),
            Self::ForbiddenError(e) => (StatusCode::FORBIDDEN, e),
            Self::NotFoundError(e) => (StatusCode::NOT_FOUND, e),
            Self::BusinessRuleError(e) => (StatusCode::CONFLICT, e),
            Self::SqlxError(ref e) if is_unique_violation(e) => {
                (StatusCode::CONFLICT, "Resource already exists.".to_string())
            }
            Self::EnrichmentError(e) => {
                error!("enrichment provider failure: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "Something went wrong. Try again later.".to_string(),
                )
            }
            Self::RequestError(e) => {
                error!("outbound request failure: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "Something went wrong. Try again later.".to_string(),
                )
            }
            other => {
                error!("internal error: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Try again later.".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

/// The derive collects messages per field; clients get the first one
/// rather than the whole map.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input provided.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_validation_message_surfaces_the_derive_message() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 8, message = "Password must contain at least 8 characters."))]
            password: String,
        }

        let err = Probe {
            password: "short".to_string(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            first_validation_message(&err),
            "Password must contain at least 8 characters."
        );
    }
}
