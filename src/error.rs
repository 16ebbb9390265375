/*
 * Responsibility
 * - 認証・認可エラーの分類 (AuthError)
 * - IntoResponse 実装 (401 / JSON `{"message": ...}`)
 * - Display の文字列がそのままレスポンスの message になる
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No authorization header set")]
    MissingCredential,

    #[error("No bearer token set")]
    MalformedCredential,

    #[error("Invalid JWT")]
    InvalidSignature,

    /// Claim set did not parse or failed temporal/issuer/audience checks.
    #[error("{0}")]
    InvalidClaims(String),

    #[error("Insufficient permissions")]
    InsufficientAccess,

    #[error("No authenticated identity in request context")]
    IdentityNotFound,
}

impl AuthError {
    /// Every variant is terminal and surfaces as 401.
    pub fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn wire_messages_match_the_taxonomy() {
        assert_eq!(
            AuthError::MissingCredential.to_string(),
            "No authorization header set"
        );
        assert_eq!(AuthError::MalformedCredential.to_string(), "No bearer token set");
        assert_eq!(AuthError::InvalidSignature.to_string(), "Invalid JWT");
        assert_eq!(
            AuthError::InvalidClaims("ExpiredSignature".into()).to_string(),
            "ExpiredSignature"
        );
        assert_eq!(
            AuthError::InsufficientAccess.to_string(),
            "Insufficient permissions"
        );
    }

    #[test]
    fn renders_json_401() {
        let res = AuthError::InsufficientAccess.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
