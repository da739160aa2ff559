//! HS256 credential signing and verification.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;

use super::claims::{CREDENTIAL_TTL_SECS, Claims};
use super::clock::{Clock, SystemClock};
use super::correlation::CorrelationId;
use super::credential::Credential;
use super::error::{SigningError, VerificationError};
use crate::config::{ConfigError, GatekeeperConfig};

/// Issues and checks bearer credentials.
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct Gatekeeper {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl Gatekeeper {
    pub fn new(config: &GatekeeperConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &GatekeeperConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;

        // Algorithm pinned: the header's alg is never trusted
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock, strictly, with no leeway
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            clock,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign a new credential for `client_id`.
    pub fn sign(&self, client_id: &str) -> Result<Credential, SigningError> {
        if client_id.is_empty() {
            return Err(SigningError::EmptyClientId);
        }

        let iat = self.clock.now().timestamp();
        let correlation_id = CorrelationId::generate(iat);
        let claims = Claims {
            iss: self.issuer.clone(),
            iat,
            exp: iat + CREDENTIAL_TTL_SECS,
            jti: correlation_id.to_hex(),
            client_id: client_id.to_string(),
        };

        let digest = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(SigningError::Encode)?;

        tracing::debug!(%correlation_id, client_id, "Credential signed");
        Ok(Credential {
            correlation_id,
            client_id: claims.client_id,
            digest,
        })
    }

    /// Check MAC, issuer, expiry and correlation id of `digest`.
    ///
    /// Does not consult the credential store.
    pub fn verify(&self, digest: &str) -> Result<Credential, VerificationError> {
        let data = decode::<Claims>(digest, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidIssuer => VerificationError::IssuerMismatch,
                _ => VerificationError::Rejected(e),
            }
        })?;
        let claims = data.claims;

        // set_issuer already enforces this; keep the comparison exact and local
        if claims.iss != self.issuer {
            return Err(VerificationError::IssuerMismatch);
        }

        let now = self.clock.now().timestamp();
        if claims.exp <= now {
            return Err(VerificationError::Expired {
                exp: claims.exp,
                now,
            });
        }

        let correlation_id: CorrelationId = claims
            .jti
            .parse()
            .map_err(|_| VerificationError::InvalidCorrelationId)?;

        Ok(Credential {
            correlation_id,
            client_id: claims.client_id,
            digest: digest.to_string(),
        })
    }
}
