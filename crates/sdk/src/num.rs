//! Conversion between human-readable decimal amounts and on-chain
//! fixed-point integers.

use alloy::primitives::{
    U256,
    utils::{format_units, parse_units},
};

use crate::error::SdkError;

/// Decimals of the stablecoin and most protocol tokens.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Fixed-point converter for a token with the given number of decimals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Converter {
    decimals: u8,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMALS)
    }
}

impl Converter {
    pub const fn new(decimals: u8) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Parses a decimal string like `"12.5"` into base units.
    ///
    /// Negative amounts and excess fractional digits are rejected.
    pub fn to_units(&self, amount: &str) -> Result<U256, SdkError> {
        let amount = amount.trim();
        if amount.starts_with('-') {
            return Err(SdkError::InvalidArgument(format!("negative amount: {amount}")));
        }
        parse_units(amount, self.decimals)
            .map(|parsed| parsed.get_absolute())
            .map_err(|err| SdkError::InvalidArgument(format!("invalid amount {amount:?}: {err}")))
    }

    /// Formats base units as a decimal string without trailing zeros.
    pub fn from_units(&self, units: U256) -> String {
        let Ok(formatted) = format_units(units, self.decimals) else {
            return units.to_string();
        };
        match formatted.split_once('.') {
            Some((int, frac)) => {
                let frac = frac.trim_end_matches('0');
                if frac.is_empty() { int.to_owned() } else { format!("{int}.{frac}") }
            },
            None => formatted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_units() {
        let c = Converter::default();
        assert_eq!(c.to_units("1").unwrap(), U256::from(10).pow(U256::from(18)));
        assert_eq!(c.to_units(" 0.5 ").unwrap(), U256::from(5) * U256::from(10).pow(U256::from(17)));
        assert_eq!(Converter::new(6).to_units("12.345").unwrap(), U256::from(12_345_000));
    }

    #[test]
    fn test_to_units_rejects_garbage() {
        let c = Converter::new(6);
        assert!(matches!(c.to_units("-1"), Err(SdkError::InvalidArgument(_))));
        assert!(matches!(c.to_units("abc"), Err(SdkError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_units() {
        let c = Converter::new(6);
        assert_eq!(c.from_units(U256::from(12_345_000)), "12.345");
        assert_eq!(c.from_units(U256::from(7_000_000)), "7");
        assert_eq!(c.from_units(U256::ZERO), "0");
    }
}
