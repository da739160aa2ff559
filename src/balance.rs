/// BALANCE CALCULATOR - pure transfer arithmetic
///
/// Given the current origin and destination balances and a transfer amount,
/// computes both resulting balances or rejects the movement.
///
/// # Enforcement Strategy:
/// 1. Comparison happens on `Decimal`, never on binary floats
/// 2. Results are rounded to cents, half away from zero
/// 3. A rejected transfer produces no balances at all
/// 4. No I/O: identical inputs always produce identical outputs
///
/// # Usage:
/// ```ignore
/// let (origin, destination) = balance_between_accounts(origin, destination, amount)?;
/// ```
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places kept on stored balances
pub const BALANCE_SCALE: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("not enough balance to execute this operation")]
    InsufficientBalance { balance: Decimal, amount: Decimal },
}

/// Round a balance to cents, half away from zero.
#[inline]
pub fn round_balance(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Move `amount` from `origin` to `destination`.
///
/// Returns `(new_origin, new_destination)`.
pub fn balance_between_accounts(
    origin: Decimal,
    destination: Decimal,
    amount: Decimal,
) -> Result<(Decimal, Decimal), BalanceError> {
    tracing::debug!(
        %amount, %origin, %destination,
        "Transferring amount between balances"
    );

    if amount > origin {
        tracing::debug!(%origin, %amount, "Balance is lower than amount");
        return Err(BalanceError::InsufficientBalance {
            balance: origin,
            amount,
        });
    }

    let new_origin = round_balance(origin - amount);
    let new_destination = round_balance(destination + amount);

    tracing::debug!(
        %new_origin, %new_destination, %amount,
        "New balances computed"
    );
    Ok((new_origin, new_destination))
}
