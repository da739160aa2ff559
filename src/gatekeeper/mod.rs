//! Gatekeeper - bearer credential issuing and checking
//!
//! A credential is an HS256 JWT whose `jti` is a 12-byte correlation id.
//! The gatekeeper only deals with the cryptographic side; whether a
//! credential is still on record is decided by [`crate::auth::AuthService`].

pub mod claims;
pub mod clock;
pub mod correlation;
pub mod credential;
pub mod error;
pub mod jwt;

pub use claims::{CREDENTIAL_TTL_SECS, Claims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use correlation::{CORRELATION_ID_LEN, CorrelationId, ParseCorrelationIdError};
pub use credential::Credential;
pub use error::{SigningError, VerificationError};
pub use jwt::Gatekeeper;
