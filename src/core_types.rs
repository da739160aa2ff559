//! Core types used throughout the system
//!
//! These are fundamental type aliases shared by the gatekeeper, the stores
//! and the transfer orchestrator.

/// Account ID - opaque identifier of a ledger account.
///
/// # Usage:
/// - Asserted by a credential as its `client_id`
/// - Origin of a transfer (always taken from the verified credential)
/// - Destination of a transfer (taken from the request payload)
pub type AccountId = String;

/// Transfer ID - assigned by the transfer record store on append
pub type TransferId = String;

/// Identity key presented at login (a CPF number)
pub type IdentityKey = String;
