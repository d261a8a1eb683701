//! Fixed-point asset amounts
//!
//! Ledger amounts carry at most four fractional decimal digits. Internally
//! an [`Amount`] is a non-negative count of *grains*, the smallest ledger
//! unit (1 unit = 10,000 grains), so arithmetic is exact and two amounts
//! that render the same compare equal.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Maximum number of fractional decimal digits in an amount
pub const AMOUNT_DECIMALS: u32 = 4;

/// Grains per whole asset unit
pub const GRAINS_PER_UNIT: i64 = 10_000;

/// A non-negative fixed-point asset amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    /// Zero amount
    pub const ZERO: Amount = Amount(0);

    /// The largest representable amount; used as the "unlimited" trust
    /// limit when opening a trust line
    pub const MAX: Amount = Amount(i64::MAX);

    /// Create an amount from a grain count
    pub fn from_grains(grains: i64) -> Result<Self> {
        if grains < 0 {
            return Err(Error::InvalidAmount(
                "amount can't be negative".to_string(),
            ));
        }
        Ok(Self(grains))
    }

    /// Get the grain count
    pub fn grains(&self) -> i64 {
        self.0
    }

    /// Whole units, truncating the fractional part
    pub fn whole_units(&self) -> i64 {
        self.0 / GRAINS_PER_UNIT
    }

    /// Checked addition
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction; `None` when the result would be negative
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).filter(|g| *g >= 0).map(Amount)
    }
}

impl FromStr for Amount {
    type Err = Error;

    /// Parse a decimal amount string.
    ///
    /// Trailing zeros in the fractional part are insignificant: `1.2300`
    /// parses like `1.23`. After stripping them, at most
    /// [`AMOUNT_DECIMALS`] fractional digits may remain.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAmount("amount can't be empty".to_string()));
        }
        if s.starts_with('-') {
            return Err(Error::InvalidAmount(
                "amount can't be negative".to_string(),
            ));
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(Error::InvalidAmount(format!("'{s}' is not a decimal number")));
        }

        let frac_digits = frac_part.trim_end_matches('0');
        if frac_digits.len() > AMOUNT_DECIMALS as usize {
            return Err(Error::InvalidAmount(format!(
                "amount can't have more than {AMOUNT_DECIMALS} digits after the decimal point"
            )));
        }

        let whole: i64 = int_part
            .parse()
            .map_err(|_| Error::InvalidAmount("amount out of range".to_string()))?;
        let mut frac_grains: i64 = 0;
        if !frac_digits.is_empty() {
            frac_grains = frac_digits
                .parse::<i64>()
                .expect("fraction digits already validated");
            frac_grains *= 10i64.pow(AMOUNT_DECIMALS - frac_digits.len() as u32);
        }

        whole
            .checked_mul(GRAINS_PER_UNIT)
            .and_then(|g| g.checked_add(frac_grains))
            .map(Amount)
            .ok_or_else(|| Error::InvalidAmount("amount out of range".to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / GRAINS_PER_UNIT;
        let frac = self.0 % GRAINS_PER_UNIT;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:04}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!("0".parse::<Amount>().unwrap(), Amount::ZERO);
        assert_eq!("1".parse::<Amount>().unwrap().grains(), 10_000);
        assert_eq!("1.2345".parse::<Amount>().unwrap().grains(), 12_345);
        assert_eq!("0.0001".parse::<Amount>().unwrap().grains(), 1);
    }

    #[test]
    fn test_trailing_zeros_are_insignificant() {
        assert_eq!(
            "1.2345000".parse::<Amount>().unwrap(),
            "1.2345".parse::<Amount>().unwrap()
        );
        assert_eq!("2.0000".parse::<Amount>().unwrap().grains(), 20_000);
    }

    #[test]
    fn test_rejects_excess_precision() {
        assert!("1.23456".parse::<Amount>().is_err());
        assert!("0.00001".parse::<Amount>().is_err());
        // Fine once the tail is only zeros
        assert!("1.23450".parse::<Amount>().is_ok());
    }

    #[test]
    fn test_rejects_negative() {
        assert!("-1".parse::<Amount>().is_err());
        assert!("-0.5".parse::<Amount>().is_err());
        assert!(Amount::from_grains(-1).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!(".5".parse::<Amount>().is_err());
        assert!("1,5".parse::<Amount>().is_err());
    }

    #[test]
    fn test_display_trims_zeros() {
        assert_eq!("1.2300".parse::<Amount>().unwrap().to_string(), "1.23");
        assert_eq!("5".parse::<Amount>().unwrap().to_string(), "5");
        assert_eq!("0.0001".parse::<Amount>().unwrap().to_string(), "0.0001");
    }

    #[test]
    fn test_checked_sub_never_negative() {
        let a = "1".parse::<Amount>().unwrap();
        let b = "2".parse::<Amount>().unwrap();
        assert_eq!(a.checked_sub(b), None);
        assert_eq!(b.checked_sub(a), Some(a));
    }

    proptest! {
        #[test]
        fn prop_display_parse_roundtrip(grains in 0i64..=i64::MAX) {
            let amount = Amount::from_grains(grains).unwrap();
            let reparsed: Amount = amount.to_string().parse().unwrap();
            prop_assert_eq!(reparsed, amount);
        }
    }
}
