//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::Decimal;

/// Floating-point percentage.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a new [`Percent`] by checking the provided values is
    /// greater than `0` and less than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants checked already")]
            Some(unsafe { Self::new_unchecked(val) })
        }
    }

    /// Creates a new [`Percent`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be greater than `0` and less than `100`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Returns this [`Percent`] of the provided `amount`, without any rounding.
    #[must_use]
    pub fn of(&self, amount: Decimal) -> Decimal {
        amount * self.0 / Decimal::ONE_HUNDRED
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            "2".parse::<Percent>().unwrap(),
            Percent::new(Decimal::TWO).unwrap(),
        );
        assert!("12.5".parse::<Percent>().is_ok());
        assert!("100".parse::<Percent>().is_ok());

        assert!("-1".parse::<Percent>().is_err());
        assert!("100.01".parse::<Percent>().is_err());
        assert!("two".parse::<Percent>().is_err());
    }

    #[test]
    fn takes_part_of_amount() {
        let two = Percent::new(Decimal::TWO).unwrap();

        assert_eq!(two.of(decimal("1000")), decimal("20"));
        assert_eq!(two.of(decimal("1234.56")), decimal("24.6912"));
        assert_eq!(two.of(Decimal::ZERO), Decimal::ZERO);
    }
}
