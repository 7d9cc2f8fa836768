//! Euro amounts and the donation tax-deduction estimate.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Share of a donation deductible from income tax (66 %).
pub const TAX_DEDUCTION_RATE: Decimal = Decimal::from_parts(66, 0, 0, false, 2);

/// Validation failures for user-entered amounts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// The input is not a decimal number.
    #[error("Montant invalide.")]
    NotANumber,
    /// Zero or negative amounts.
    #[error("Le montant doit être supérieur à zéro.")]
    NotPositive,
}

/// Amount in euros.
///
/// # Examples
/// ```
/// use portal::domain::Amount;
///
/// let amount: Amount = "50".parse().expect("valid amount");
/// assert_eq!(amount.to_string(), "50.00 €");
/// assert_eq!(amount.tax_deduction().to_string(), "33.00 €");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Underlying decimal.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Estimated tax deduction, rounded half-up to the cent.
    #[must_use]
    pub fn tax_deduction(&self) -> Self {
        Self(
            (self.0 * TAX_DEDUCTION_RATE)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Parse a user-entered, strictly positive amount.
    ///
    /// Accepts a comma as decimal separator, as typed on French keyboards.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError`] for non-numeric or non-positive input.
    pub fn parse_positive(raw: &str) -> Result<Self, AmountError> {
        let amount: Self = raw.parse()?;
        if amount.0 <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }
        Ok(amount)
    }

    /// Completion ratio of `self` over `target`, as a whole percentage capped
    /// at 100.
    #[must_use]
    pub fn percent_of(&self, target: &Self) -> u8 {
        if target.0 <= Decimal::ZERO {
            return 0;
        }
        let ratio = (self.0 * Decimal::ONE_HUNDRED / target.0)
            .round_dp_with_strategy(0, RoundingStrategy::ToZero)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        u8::try_from(ratio.mantissa()).unwrap_or(100)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().replace(',', ".");
        Decimal::from_str(&normalised)
            .map(Self)
            .map_err(|_| AmountError::NotANumber)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{rounded:.2} €")
    }
}
