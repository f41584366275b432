//! Decimal type utilities for precise balance arithmetic

pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

/// Account balance
pub type Balance = Decimal;

/// Amount moved by a deposit or withdrawal
pub type Amount = Decimal;

/// Precision helpers for common operations
pub mod precision {
    use super::*;
    use crate::error::{Error, Result};

    /// Fractional digits kept for balances and amounts
    pub const BALANCE_SCALE: u32 = 2;

    /// Largest balance a NUMERIC(18,2) column holds
    pub const MAX_BALANCE: Balance = dec!(9999999999999999.99);

    /// Bring a balance read from or written to a store into canonical form
    pub fn normalize_balance(balance: Balance) -> Balance {
        let mut normalized = balance.round_dp(BALANCE_SCALE);
        normalized.rescale(BALANCE_SCALE);
        normalized
    }

    /// Reject amounts with more precision than a balance can hold
    pub fn check_scale(amount: Amount, field: &str) -> Result<()> {
        if amount.normalize().scale() > BALANCE_SCALE {
            return Err(Error::ValidationError(format!(
                "{} must have at most {} decimal places",
                field, BALANCE_SCALE
            )));
        }
        Ok(())
    }

    /// Validate an amount that must be strictly positive
    pub fn check_positive(amount: Amount, field: &str) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::ValidationError(format!("{} must be greater than zero", field)));
        }
        if amount > MAX_BALANCE {
            return Err(Error::ValidationError(format!(
                "{} must not exceed {}",
                field, MAX_BALANCE
            )));
        }
        check_scale(amount, field)
    }
}

#[cfg(test)]
mod tests {
    use super::precision::*;
    use super::*;

    #[test]
    fn normalize_pads_to_scale() {
        let balance = normalize_balance(dec!(1000));
        assert_eq!(balance.scale(), BALANCE_SCALE);
        assert_eq!(balance.to_string(), "1000.00");
    }

    #[test]
    fn trailing_zeros_do_not_count_against_scale() {
        assert!(check_scale(dec!(12.500), "amount").is_ok());
        assert!(check_scale(dec!(12.505), "amount").is_err());
    }

    #[test]
    fn zero_and_negative_are_not_positive() {
        assert!(check_positive(Decimal::ZERO, "amount").is_err());
        assert!(check_positive(dec!(-5), "amount").is_err());
        assert!(check_positive(dec!(0.01), "amount").is_ok());
    }

    #[test]
    fn amounts_are_capped_at_the_column_limit() {
        assert!(check_positive(MAX_BALANCE, "amount").is_ok());
        assert!(check_positive(MAX_BALANCE + dec!(0.01), "amount").is_err());
        assert!(check_positive(dec!(7e28), "amount").is_err());
    }
}
