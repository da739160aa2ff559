use std::sync::Arc;
use std::time::Duration;

use super::error::AuthError;
use super::models::Login;
use super::password::verify_secret;
use crate::gatekeeper::{Credential, Gatekeeper, VerificationError};
use crate::storage::{AccountLedger, CredentialStore, StoreError, with_timeout};

/// Login, verification and revocation over a [`Gatekeeper`] and the stores.
pub struct AuthService {
    gatekeeper: Arc<Gatekeeper>,
    credentials: Arc<dyn CredentialStore>,
    ledger: Arc<dyn AccountLedger>,
    timeout: Duration,
}

impl AuthService {
    pub fn new(
        gatekeeper: Arc<Gatekeeper>,
        credentials: Arc<dyn CredentialStore>,
        ledger: Arc<dyn AccountLedger>,
        timeout: Duration,
    ) -> Self {
        Self {
            gatekeeper,
            credentials,
            ledger,
            timeout,
        }
    }

    /// Check the secret for `login.cpf` and issue a persisted credential.
    pub async fn login(&self, login: &Login) -> Result<Credential, AuthError> {
        let record = match with_timeout(self.timeout, self.ledger.find_login(&login.cpf)).await {
            Ok(r) => r,
            Err(StoreError::NotFound) => {
                tracing::info!(cpf = %login.cpf, "Login rejected: unknown identity");
                return Err(AuthError::InvalidLogin);
            }
            Err(e) => return Err(AuthError::Store(e)),
        };

        if !verify_secret(&login.secret, &record.secret_hash)? {
            tracing::info!(cpf = %login.cpf, "Login rejected: secret mismatch");
            return Err(AuthError::InvalidLogin);
        }

        let credential = self.gatekeeper.sign(&record.account_id)?;

        // Not persisted means not issued: the caller never sees it
        with_timeout(self.timeout, self.credentials.insert_credential(&credential))
            .await
            .map_err(AuthError::Store)?;

        tracing::info!(
            client_id = %credential.client_id,
            correlation_id = %credential.correlation_id,
            "Credential issued"
        );
        Ok(credential)
    }

    /// Full verification: signature, issuer, expiry, then issuance record.
    pub async fn verify(&self, digest: &str) -> Result<Credential, AuthError> {
        let result = self.verify_inner(digest).await;
        if let Err(e) = &result {
            match e {
                VerificationError::Store(source) => {
                    tracing::error!(reason = e.reason(), error = %source, "Credential lookup failed")
                }
                _ => tracing::warn!(reason = e.reason(), "Credential verification failed"),
            }
        }
        result.map_err(AuthError::AccessDenied)
    }

    async fn verify_inner(&self, digest: &str) -> Result<Credential, VerificationError> {
        let credential = self.gatekeeper.verify(digest)?;

        let stored = with_timeout(
            self.timeout,
            self.credentials.find_credential(&credential.correlation_id),
        )
        .await
        .map_err(|e| match e {
            StoreError::NotFound => VerificationError::NotIssued,
            other => VerificationError::Store(other),
        })?;

        if stored.digest != credential.digest || stored.client_id != credential.client_id {
            return Err(VerificationError::NotIssued);
        }
        Ok(credential)
    }

    /// Delete the issuance record; later verification fails by absence.
    pub async fn revoke(&self, credential: &Credential) -> Result<(), AuthError> {
        match with_timeout(
            self.timeout,
            self.credentials.delete_credential(&credential.correlation_id),
        )
        .await
        {
            Ok(()) | Err(StoreError::NotFound) => {
                tracing::info!(
                    client_id = %credential.client_id,
                    correlation_id = %credential.correlation_id,
                    "Credential revoked"
                );
                Ok(())
            }
            Err(e) => Err(AuthError::Store(e)),
        }
    }
}
