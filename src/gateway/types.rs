//! API envelope and error mapping
//!
//! Every response body is `{code, msg, data}`; `code == 0` means success.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::account::AccountError;
use crate::auth::AuthError;
use crate::error::{ACCESS_DENIED_MSG, ErrorKind, INTERNAL_MSG};
use crate::transfer::TransferError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_INPUT: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const DUPLICATE_CPF: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;

    // Auth errors (2xxx)
    pub const ACCESS_DENIED: i32 = 2001;
    pub const INVALID_LOGIN: i32 = 2003;

    // Concurrency (4xxx)
    pub const CONFLICT: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Error leaving a handler. Carries only what the caller may see.
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn access_denied() -> Self {
        Self {
            kind: ErrorKind::AccessDenied,
            code: error_codes::ACCESS_DENIED,
            msg: ACCESS_DENIED_MSG.to_string(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            code: error_codes::INVALID_INPUT,
            msg: msg.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            kind: ErrorKind::Internal,
            code: error_codes::INTERNAL_ERROR,
            msg: INTERNAL_MSG.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ApiResponse::<()>::error(self.code, self.msg))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e.kind() {
            ErrorKind::AccessDenied => ApiError::access_denied(),
            ErrorKind::InvalidLogin => ApiError {
                kind: ErrorKind::InvalidLogin,
                code: error_codes::INVALID_LOGIN,
                msg: e.to_string(),
            },
            _ => {
                tracing::error!(code = e.code(), error = ?e, "Authentication failed internally");
                ApiError::internal()
            }
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        match e.kind() {
            ErrorKind::AccessDenied => ApiError::access_denied(),
            ErrorKind::InvalidInput => ApiError {
                kind: ErrorKind::InvalidInput,
                code: match &e {
                    TransferError::InsufficientBalance(_) => error_codes::INSUFFICIENT_BALANCE,
                    _ => error_codes::INVALID_INPUT,
                },
                msg: e.to_string(),
            },
            ErrorKind::Conflict => ApiError {
                kind: ErrorKind::Conflict,
                code: error_codes::CONFLICT,
                msg: e.to_string(),
            },
            // already logged in full by the coordinator
            ErrorKind::InvalidLogin | ErrorKind::NotFound | ErrorKind::Internal => {
                ApiError::internal()
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e.kind() {
            ErrorKind::InvalidInput => ApiError {
                kind: ErrorKind::InvalidInput,
                code: match &e {
                    AccountError::DuplicateCpf => error_codes::DUPLICATE_CPF,
                    _ => error_codes::INVALID_INPUT,
                },
                msg: e.to_string(),
            },
            ErrorKind::NotFound => ApiError {
                kind: ErrorKind::NotFound,
                code: error_codes::NOT_FOUND,
                msg: e.to_string(),
            },
            _ => {
                tracing::error!(code = e.code(), error = ?e, "Account operation failed");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_input(rejection.body_text())
    }
}
