use std::{
    borrow::Cow,
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Serialize};
use sqlx::{
    database::{HasArguments, HasValueRef},
    encode::IsNull,
    error::BoxDynError,
    sqlite::SqliteArgumentValue,
    Decode,
    Encode,
    Sqlite,
    Type,
};
use thiserror::Error;

//--------------------------------------       Money        ----------------------------------------------------------
/// An exact base-10 currency amount.
///
/// All monetary arithmetic in the gateway goes through this type. Amounts are never converted to binary floating
/// point, so values like `0.10` are represented exactly. Rounding uses round-half-away-from-zero, which is the
/// familiar "half up" rule for the non-negative amounts this system carries.
///
/// In SQLite, `Money` is stored as a TEXT column holding the decimal numeral. In JSON, it only ever appears as a
/// string, never as a raw number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(Decimal);

#[derive(Debug, Clone, Error)]
#[error("Not a valid monetary amount: {0}")]
pub struct InvalidAmountError(String);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rounds to `dp` fractional digits, half away from zero.
    pub fn rounded(&self, dp: u32) -> Self {
        Self(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Money {
    type Err = InvalidAmountError;

    /// Accepts plain decimal numerals only. Scientific notation, empty strings and anything else that is not a
    /// well-formed base-10 numeral is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self).map_err(|_| InvalidAmountError(s.to_string()))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl de::Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a decimal amount encoded as a string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(de::Error::custom)
            }
        }
        deserializer.deserialize_str(MoneyVisitor)
    }
}

// SQLite has no decimal column type, so Money travels as TEXT and is parsed on the way out.
impl Type<Sqlite> for Money {
    fn type_info() -> <Sqlite as sqlx::Database>::TypeInfo {
        <&str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &<Sqlite as sqlx::Database>::TypeInfo) -> bool {
        <&str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Money {
    fn encode_by_ref(&self, buf: &mut <Sqlite as HasArguments<'q>>::ArgumentBuffer) -> IsNull {
        buf.push(SqliteArgumentValue::Text(Cow::Owned(self.0.to_string())));
        IsNull::No
    }
}

impl<'r> Decode<'r, Sqlite> for Money {
    fn decode(value: <Sqlite as HasValueRef<'r>>::ValueRef) -> Result<Self, BoxDynError> {
        let s = <&str as Decode<Sqlite>>::decode(value)?;
        Ok(s.parse::<Money>()?)
    }
}

//--------------------------------------      TaxRate       ----------------------------------------------------------
/// A configured tax multiplier, e.g. `0.19` for a 19% rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate(Decimal);

#[derive(Debug, Clone, Error)]
#[error("Not a valid tax rate: {0}")]
pub struct InvalidRateError(String);

impl TaxRate {
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        // 19%, matching the gateway's default configuration
        Self(Decimal::new(19, 2))
    }
}

impl FromStr for TaxRate {
    type Err = InvalidRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self).map_err(|_| InvalidRateError(s.to_string()))
    }
}

impl Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Mul<TaxRate> for Money {
    type Output = Money;

    fn mul(self, rhs: TaxRate) -> Self::Output {
        Money(self.0 * rhs.0)
    }
}
