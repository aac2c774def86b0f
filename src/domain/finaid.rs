use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::semester::Semester;

/// A currency amount with two decimal places, stored as whole cents.
///
/// Amounts deserialize from integers, floats or strings such as `"-1.00"`,
/// and serialize as strings so no precision is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "AmountRepr", into = "String")]
pub struct Amount(i64);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from a whole number of currency units, returning
    /// `None` if the amount in cents would overflow.
    #[must_use]
    pub const fn from_units(units: i64) -> Option<Self> {
        Self(units).checked_mul(100)
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiplies the amount, returning `None` on overflow.
    #[must_use]
    pub const fn checked_mul(self, factor: i64) -> Option<Self> {
        match self.0.checked_mul(factor) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}

/// Error returned when a string is not a valid currency amount.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Invalid amount '{0}': expected a number with at most two decimal places")]
pub struct AmountError(String);

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || AmountError(s.to_string());
        let trimmed = s.trim();

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (units, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if units.is_empty()
            || fraction.len() > 2
            || !units.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(error());
        }

        let units: i64 = units.parse().map_err(|_| error())?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| error())? * 10,
            _ => fraction.parse().map_err(|_| error())?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .ok_or_else(error)?;

        Ok(Self(if negative { -cents } else { cents }))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl TryFrom<AmountRepr> for Amount {
    type Error = AmountError;

    fn try_from(value: AmountRepr) -> Result<Self, Self::Error> {
        match value {
            AmountRepr::Integer(units) => {
                Self::from_units(units).ok_or_else(|| AmountError(units.to_string()))
            }
            AmountRepr::Float(value) => format!("{value:.2}").parse(),
            AmountRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

/// How often a source of aid pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentFrequency {
    /// Once a year.
    Yearly,
    /// Once a semester, twice a year.
    Semesterly,
    /// Twelve times a year.
    Monthly,
    /// Fifty-two times a year.
    Weekly,
}

impl InstallmentFrequency {
    /// Number of installments in a year.
    #[must_use]
    pub const fn per_year(self) -> i64 {
        match self {
            Self::Yearly => 1,
            Self::Semesterly => 2,
            Self::Monthly => 12,
            Self::Weekly => 52,
        }
    }
}

impl FromStr for InstallmentFrequency {
    type Err = FinaidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearly" => Ok(Self::Yearly),
            "semesterly" => Ok(Self::Semesterly),
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            other => Err(FinaidError::UnknownFrequency(other.to_string())),
        }
    }
}

/// Errors computing derived financial aid figures.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FinaidError {
    /// The frequency is not one of `yearly`, `semesterly`, `monthly` or
    /// `weekly`.
    #[error("cannot calculate using frequency: '{0}'")]
    UnknownFrequency(String),

    /// No installment amount was given.
    #[error("no installment amount given")]
    MissingAmount,

    /// The yearly amount does not fit.
    #[error("yearly amount overflows")]
    Overflow,
}

/// One source of financial aid declared by the applicant.
///
/// Every text field may be left blank while the application is a draft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialAid {
    /// Identity of the row, used to locate issues.
    pub id: i64,

    /// Kind of aid, e.g. `scholarship` or `loan`.
    pub aid_type: String,

    /// Who provides the aid.
    pub provider: String,

    /// How often the aid pays out. See [`InstallmentFrequency`].
    pub installment_frequency: String,

    /// The amount of each installment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_amount: Option<Amount>,

    /// The last semester the aid is received in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester_finished: Option<Semester>,
}

impl FinancialAid {
    /// The installment amount scaled to a full year.
    ///
    /// # Errors
    ///
    /// Fails if the frequency is unknown, the amount is missing, or the
    /// result overflows.
    pub fn yearly_amount(&self) -> Result<Amount, FinaidError> {
        let frequency: InstallmentFrequency = self.installment_frequency.parse()?;
        let amount = self.installment_amount.ok_or(FinaidError::MissingAmount)?;
        amount
            .checked_mul(frequency.per_year())
            .ok_or(FinaidError::Overflow)
    }
}
