//! Outward error categories
//!
//! Every failure the service can report falls into exactly one kind.
//! Callers branch on the kind, never on the message.

use serde::Serialize;

/// Body text for every access-denied answer, whatever the internal reason
pub const ACCESS_DENIED_MSG: &str =
    "it seems you don't have or didn't pass valid credentials to this route";

/// Body text for every internal failure
pub const INTERNAL_MSG: &str = "internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    AccessDenied,
    InvalidLogin,
    InvalidInput,
    Conflict,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::AccessDenied => 401,
            ErrorKind::InvalidLogin => 403,
            ErrorKind::InvalidInput => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::AccessDenied => "ACCESS_DENIED",
            ErrorKind::InvalidLogin => "INVALID_LOGIN",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::AccessDenied.http_status(), 401);
        assert_eq!(ErrorKind::InvalidLogin.http_status(), 403);
        assert_eq!(ErrorKind::InvalidInput.http_status(), 400);
        assert_eq!(ErrorKind::Conflict.http_status(), 409);
        assert_eq!(ErrorKind::NotFound.http_status(), 404);
        assert_eq!(ErrorKind::Internal.http_status(), 500);
    }
}
