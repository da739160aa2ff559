//! Transfer state machine states

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferState {
    Unauthenticated,
    /// Credential verified; origin account known
    Authenticated,
    BalancesFetched,
    BalancesComputed,
    /// Origin written; destination not yet
    OriginUpdated,
    DestinationUpdated,
    /// Terminal: both balances written and the record appended
    Recorded,
    /// Terminal
    Failed,
}

impl TransferState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferState::Recorded | TransferState::Failed)
    }

    /// True once a balance may have been written
    #[inline]
    pub fn has_side_effects(&self) -> bool {
        matches!(
            self,
            TransferState::OriginUpdated | TransferState::DestinationUpdated | TransferState::Recorded
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Unauthenticated => "UNAUTHENTICATED",
            TransferState::Authenticated => "AUTHENTICATED",
            TransferState::BalancesFetched => "BALANCES_FETCHED",
            TransferState::BalancesComputed => "BALANCES_COMPUTED",
            TransferState::OriginUpdated => "ORIGIN_UPDATED",
            TransferState::DestinationUpdated => "DESTINATION_UPDATED",
            TransferState::Recorded => "RECORDED",
            TransferState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
