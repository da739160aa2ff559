//! Authentication - login, full credential verification and revocation
//!
//! The gatekeeper checks what a digest says; this layer also checks that
//! the system actually issued it and has not revoked it since.

pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use error::AuthError;
pub use middleware::{bearer_auth_middleware, parse_bearer};
pub use models::{Login, LoginResponse};
pub use password::{hash_secret, verify_secret};
pub use service::AuthService;
