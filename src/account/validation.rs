//! Validated account fields
//!
//! Fields are private so a value of these types is always well formed.

use rust_decimal::Decimal;
use std::fmt;

use crate::balance::BALANCE_SCALE;

const CPF_LEN: usize = 11;
const NAME_MAX_LEN: usize = 128;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid length for {field}: expected {min}-{max}, got {actual}")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Invalid format for {field} (expected: {expected})")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },

    #[error("cpf check digits do not match")]
    CpfChecksum,

    #[error("Opening balance must not be negative")]
    NegativeBalance,

    #[error("Opening balance must have at most {max} decimal places")]
    BalanceScale { max: u32 },
}

/// Brazilian taxpayer id: 11 digits, both mod-11 check digits valid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.len() != CPF_LEN {
            return Err(ValidationError::InvalidLength {
                field: "cpf",
                min: CPF_LEN,
                max: CPF_LEN,
                actual: raw.len(),
            });
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "cpf",
                expected: "digits only",
            });
        }

        let digits: Vec<u32> = raw.bytes().map(|b| u32::from(b - b'0')).collect();
        // 000.000.000-00, 111.111.111-11, ... pass the checksum but are not issued
        if digits.iter().all(|&d| d == digits[0]) {
            return Err(ValidationError::CpfChecksum);
        }
        if check_digit(&digits[..9]) != digits[9] || check_digit(&digits[..10]) != digits[10] {
            return Err(ValidationError::CpfChecksum);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weights run from `len + 1` down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let weight_top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_top - i as u32))
        .sum();
    match sum * 10 % 11 {
        10 => 0,
        r => r,
    }
}

/// Account holder name, trimmed and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountName(String);

impl AccountName {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        let chars = name.chars().count();
        if chars == 0 || chars > NAME_MAX_LEN {
            return Err(ValidationError::InvalidLength {
                field: "name",
                min: 1,
                max: NAME_MAX_LEN,
                actual: chars,
            });
        }
        if name.chars().any(char::is_control) {
            return Err(ValidationError::InvalidFormat {
                field: "name",
                expected: "printable characters",
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

pub fn validate_secret(secret: &str) -> Result<(), ValidationError> {
    if secret.is_empty() {
        return Err(ValidationError::InvalidLength {
            field: "secret",
            min: 1,
            max: usize::MAX,
            actual: 0,
        });
    }
    Ok(())
}

/// Non-negative, at most two decimal places. Returns the normalized value.
pub fn validate_opening_balance(balance: Decimal) -> Result<Decimal, ValidationError> {
    if balance.is_sign_negative() && !balance.is_zero() {
        return Err(ValidationError::NegativeBalance);
    }
    let balance = balance.normalize();
    if balance.scale() > BALANCE_SCALE {
        return Err(ValidationError::BalanceScale { max: BALANCE_SCALE });
    }
    Ok(balance)
}
