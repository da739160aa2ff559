//! Transfer - authenticated balance movement between two accounts
//!
//! One request runs the state machine once:
//!
//! ```text
//! Unauthenticated -> Authenticated -> BalancesFetched -> BalancesComputed
//!     -> OriginUpdated -> DestinationUpdated -> Recorded
//! ```
//!
//! Any step may end in `Failed`. Nothing is written before
//! `BalancesComputed`, and each balance write is conditioned on the value
//! read in `BalancesFetched`.

pub mod coordinator;
pub mod error;
pub mod state;
pub mod types;


pub use coordinator::{TransferCoordinator, TransferOptions};
pub use error::TransferError;
pub use state::TransferState;
pub use types::{TransferReceipt, TransferRequest};
