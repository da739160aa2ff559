//! Transfer Gate - authenticated balance transfers
//!
//! # Modules
//!
//! - [`gatekeeper`] - HS256 bearer credentials: sign and verify
//! - [`auth`] - login, full verification against issued credentials, revocation
//! - [`account`] - account creation, balances and transfer history
//! - [`balance`] - two-account balance arithmetic
//! - [`transfer`] - the transfer state machine
//! - [`storage`] - credential store, account ledger, transfer records
//! - [`gateway`] - axum HTTP surface

pub mod core_types;
pub mod error;

pub mod balance;
pub mod money;

pub mod account;
pub mod auth;
pub mod gatekeeper;
pub mod storage;
pub mod transfer;

pub mod config;
pub mod gateway;
pub mod logging;

pub use account::{AccountError, AccountService, NewAccount};
pub use auth::{AuthError, AuthService, Login};
pub use balance::{BalanceError, balance_between_accounts};
pub use core_types::{AccountId, IdentityKey, TransferId};
pub use error::ErrorKind;
pub use gatekeeper::{Credential, Gatekeeper, SigningError, VerificationError};
pub use money::Amount;
pub use storage::{MemoryStore, PgStore, StoreError};
pub use transfer::{TransferCoordinator, TransferError, TransferOptions, TransferRequest};
