//! Transfer Coordinator
//!
//! Drives one transfer through the state machine. Stateless between calls;
//! share it behind an `Arc`.

use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::error::TransferError;
use super::state::TransferState;
use super::types::{TransferReceipt, TransferRequest};
use crate::auth::AuthService;
use crate::balance::balance_between_accounts;
use crate::error::ErrorKind;
use crate::gatekeeper::Credential;
use crate::storage::{
    AccountLedger, DEFAULT_STORE_TIMEOUT, NewTransfer, StoreError, TransferRecordStore, with_timeout,
};

#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    /// Upper bound for every store call
    pub timeout: Duration,
    /// Write back previous balances when a step after the origin write fails
    pub compensate_on_partial_failure: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_STORE_TIMEOUT,
            compensate_on_partial_failure: false,
        }
    }
}

/// A balance write to undo: set `account` back from `written` to `previous`.
struct Undo<'a> {
    account: &'a str,
    written: Decimal,
    previous: Decimal,
}

/// Tracks and logs the current state of one run
struct Progress<'a> {
    origin: &'a str,
    destination: &'a str,
    state: TransferState,
}

impl<'a> Progress<'a> {
    fn new(origin: &'a str, destination: &'a str) -> Self {
        Self {
            origin,
            destination,
            state: TransferState::Unauthenticated,
        }
    }

    fn advance(&mut self, next: TransferState) {
        debug!(
            origin = self.origin,
            destination = self.destination,
            from = %self.state,
            to = %next,
            "Transfer state transition"
        );
        self.state = next;
    }
}

pub struct TransferCoordinator {
    auth: Arc<AuthService>,
    ledger: Arc<dyn AccountLedger>,
    records: Arc<dyn TransferRecordStore>,
    options: TransferOptions,
}

impl TransferCoordinator {
    pub fn new(
        auth: Arc<AuthService>,
        ledger: Arc<dyn AccountLedger>,
        records: Arc<dyn TransferRecordStore>,
        options: TransferOptions,
    ) -> Self {
        Self {
            auth,
            ledger,
            records,
            options,
        }
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Verify `digest`, then run the transfer for the identity it asserts.
    pub async fn execute(
        &self,
        digest: &str,
        req: TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        let credential = self
            .auth
            .verify(digest)
            .await
            .map_err(TransferError::AccessDenied)?;
        self.execute_verified(&credential, req).await
    }

    /// Run the transfer for an already verified credential.
    ///
    /// The origin account is always `credential.client_id`.
    pub async fn execute_verified(
        &self,
        credential: &Credential,
        req: TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        let origin = credential.client_id.as_str();
        let destination = req.account_destination_id.as_str();
        let mut progress = Progress::new(origin, destination);
        progress.advance(TransferState::Authenticated);

        let result = self
            .run(&mut progress, origin, destination, req.amount.value())
            .await;

        match &result {
            Ok(receipt) => {
                info!(
                    transfer_id = %receipt.transfer_id,
                    origin,
                    destination,
                    amount = %receipt.amount,
                    "Transfer recorded"
                );
            }
            Err(e) => {
                let reached = progress.state;
                progress.advance(TransferState::Failed);
                match e.kind() {
                    ErrorKind::Internal => error!(
                        origin,
                        destination,
                        reached = %reached,
                        code = e.code(),
                        error = ?e,
                        "Transfer failed"
                    ),
                    _ => info!(
                        origin,
                        destination,
                        reached = %reached,
                        code = e.code(),
                        "Transfer rejected"
                    ),
                }
            }
        }
        result
    }

    async fn run(
        &self,
        progress: &mut Progress<'_>,
        origin: &str,
        destination: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, TransferError> {
        if destination.is_empty() {
            return Err(TransferError::MissingDestination);
        }
        if origin == destination {
            return Err(TransferError::SameAccount);
        }

        let origin_balance = self
            .call(self.ledger.get_balance(origin))
            .await
            .map_err(|e| match e {
                StoreError::NotFound => TransferError::OriginNotFound(origin.to_string()),
                source => TransferError::Store {
                    step: "fetch_origin",
                    source,
                },
            })?;
        let destination_balance = self
            .call(self.ledger.get_balance(destination))
            .await
            .map_err(|e| match e {
                StoreError::NotFound => TransferError::DestinationNotFound,
                source => TransferError::Store {
                    step: "fetch_destination",
                    source,
                },
            })?;
        progress.advance(TransferState::BalancesFetched);

        let (new_origin, new_destination) =
            balance_between_accounts(origin_balance, destination_balance, amount)?;
        progress.advance(TransferState::BalancesComputed);

        self.call(self.ledger.update_balance(origin, origin_balance, new_origin))
            .await
            .map_err(|e| match e {
                StoreError::Conflict => TransferError::BalanceChanged {
                    account_id: origin.to_string(),
                },
                StoreError::NotFound => TransferError::OriginNotFound(origin.to_string()),
                source => TransferError::Store {
                    step: "update_origin",
                    source,
                },
            })?;
        progress.advance(TransferState::OriginUpdated);

        if let Err(e) = self
            .call(
                self.ledger
                    .update_balance(destination, destination_balance, new_destination),
            )
            .await
        {
            // Conflict and NotFound mean the destination was never written:
            // the origin debit is the only effect and is always rolled back
            let untouched = matches!(e, StoreError::Conflict | StoreError::NotFound);
            let undo = [Undo {
                account: origin,
                written: new_origin,
                previous: origin_balance,
            }];
            let undone = if untouched {
                self.undo(&undo).await
            } else {
                self.compensate(&undo).await
            };
            return Err(match (e, undone) {
                (StoreError::Conflict, true) => TransferError::BalanceChanged {
                    account_id: destination.to_string(),
                },
                (StoreError::NotFound, true) => TransferError::DestinationNotFound,
                (source, true) => TransferError::Store {
                    step: "update_destination",
                    source,
                },
                (source, false) => TransferError::PartialCommit {
                    step: "update_destination",
                    source,
                },
            });
        }
        progress.advance(TransferState::DestinationUpdated);

        let appended = self
            .call(self.records.append_transfer(NewTransfer {
                origin_account_id: origin.to_string(),
                destination_account_id: destination.to_string(),
                amount,
            }))
            .await;
        let record = match appended {
            Ok(record) => record,
            Err(source) => {
                let undone = self
                    .compensate(&[
                        Undo {
                            account: destination,
                            written: new_destination,
                            previous: destination_balance,
                        },
                        Undo {
                            account: origin,
                            written: new_origin,
                            previous: origin_balance,
                        },
                    ])
                    .await;
                let step = "append_record";
                return Err(if undone {
                    TransferError::Store { step, source }
                } else {
                    TransferError::PartialCommit { step, source }
                });
            }
        };
        progress.advance(TransferState::Recorded);

        Ok(TransferReceipt::new(record, new_origin))
    }

    async fn call<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        with_timeout(self.options.timeout, fut).await
    }

    /// Undo writes if compensation is enabled.
    async fn compensate(&self, undo: &[Undo<'_>]) -> bool {
        if !self.options.compensate_on_partial_failure {
            return false;
        }
        self.undo(undo).await
    }

    /// Undo writes in order. Returns true only if every write was undone.
    async fn undo(&self, undo: &[Undo<'_>]) -> bool {
        for step in undo {
            warn!(account = step.account, "Compensating balance write");
            let restored = self
                .call(
                    self.ledger
                        .update_balance(step.account, step.written, step.previous),
                )
                .await;
            if let Err(e) = restored {
                error!(account = step.account, error = %e, "Compensation failed");
                return false;
            }
        }
        true
    }
}
