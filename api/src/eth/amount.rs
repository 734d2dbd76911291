// ETH amounts held exactly in wei

use std::fmt;

use alloy::primitives::utils::parse_ether;
use alloy::primitives::U256;
use thiserror::Error;

/// Decimal places of one ether expressed in wei
pub const ETH_DECIMALS: usize = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount '{0}': expected a decimal number of ETH")]
    Malformed(String),
    #[error("Amount must be greater than zero")]
    NotPositive,
    #[error("Amount has more than 18 decimal places")]
    TooPrecise,
    #[error("Amount is too large")]
    TooLarge,
}

/// A positive ETH amount with at most 18 fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthAmount {
    wei: U256,
}

impl EthAmount {
    /// Parses plain decimal notation such as `1`, `0.5` or `2.000`.
    ///
    /// Only ASCII digits and one `.` are accepted; exponents, separators and
    /// signs other than a leading `-` are malformed.
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        let malformed = || AmountError::Malformed(trimmed.to_string());

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) if !fraction.is_empty() => (whole, fraction),
            Some(_) => return Err(malformed()),
            None => (unsigned, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(malformed());
        }

        if fraction.len() > ETH_DECIMALS {
            return Err(AmountError::TooPrecise);
        }
        if negative {
            return Err(AmountError::NotPositive);
        }

        let wei = parse_ether(unsigned).map_err(|_| AmountError::TooLarge)?;
        if wei.is_zero() {
            return Err(AmountError::NotPositive);
        }
        Ok(EthAmount { wei })
    }

    pub fn wei(&self) -> U256 {
        self.wei
    }
}

/// Canonical form without trailing zeros, e.g. `1.5`
impl fmt::Display for EthAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = U256::from(10u64).pow(U256::from(ETH_DECIMALS));
        let whole = self.wei / unit;
        let fraction = self.wei % unit;
        if fraction.is_zero() {
            return write!(f, "{}", whole);
        }

        let digits = format!("{:0>width$}", fraction.to_string(), width = ETH_DECIMALS);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}
