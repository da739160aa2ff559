//! Money types for the transfer payload
//!
//! - `Amount`: strictly positive decimal with at most two decimal places,
//!   accepted as JSON number or string
//!
//! JSON numbers are parsed from their shortest textual form, so `11.11`
//! becomes exactly `11.11` and never the nearest binary float.

use rust_decimal::prelude::*;
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::balance::BALANCE_SCALE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount must be greater than zero")]
    NotPositive,

    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("Amount must have at most {max} decimal places, got {got}")]
    TooManyDecimals { max: u32, got: u32 },
}

/// Strictly positive transfer amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        let value = value.normalize();
        if value.scale() > BALANCE_SCALE {
            return Err(MoneyError::TooManyDecimals {
                max: BALANCE_SCALE,
                got: value.scale(),
            });
        }
        Ok(Self(value))
    }

    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MoneyError::InvalidFormat("empty".to_string()));
        }
        // Scientific notation and + prefix are not amounts a client should send
        if s.contains(['e', 'E']) || s.starts_with('+') {
            return Err(MoneyError::InvalidFormat(s.to_string()));
        }
        let d = Decimal::from_str(s).map_err(|e| MoneyError::InvalidFormat(e.to_string()))?;
        Self::new(d)
    }

    #[inline]
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl std::ops::Deref for Amount {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a positive decimal amount as number or string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        if !v.is_finite() {
            return Err(E::custom(MoneyError::InvalidFormat(v.to_string())));
        }
        // f64 Display prints the shortest round-tripping representation
        Amount::parse(&v.to_string()).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as string to preserve precision
        serializer.serialize_str(&self.0.to_string())
    }
}
