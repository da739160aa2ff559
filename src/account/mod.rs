//! Account - provisioning, balance lookup and transfer history
//!
//! Creation validates every field before hashing the secret with
//! [`hash_secret`](crate::auth::hash_secret); the stored hash never leaves
//! the storage layer.

pub mod error;
pub mod models;
pub mod service;
pub mod validation;

pub use error::AccountError;
pub use models::{AccountTransfers, AccountView, BalanceView, CreatedAccount, NewAccount};
pub use service::AccountService;
pub use validation::{AccountName, Cpf, ValidationError};
