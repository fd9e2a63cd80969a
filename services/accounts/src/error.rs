//! Errors surfaced by the account service and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures that handlers report to clients.
#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    /// The request body or query string lacked a required value.
    #[error("{0}")]
    Validation(&'static str),
    /// Registration attempted to reuse an existing username.
    #[error("username already exists")]
    UsernameTaken,
    /// Login failed because the user is unknown or the password is wrong.
    #[error("invalid username or password")]
    InvalidCredentials,
    /// The backing store rejected an operation.
    #[error("{context}")]
    Database {
        /// Message returned to the client.
        context: &'static str,
        /// Underlying driver error, logged but never returned.
        #[source]
        source: sqlx::Error,
    },
}

impl AccountsError {
    /// Wraps a store failure with the message shown to clients.
    pub(crate) fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Database { context, source }
    }

    /// HTTP status code reported for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UsernameTaken => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Database { context, source } = &self {
            tracing::error!(error = %source, "{context}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
