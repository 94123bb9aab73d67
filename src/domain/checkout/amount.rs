//! Amount formatting for provider requests.

use super::currency::CurrencyCode;
use super::errors::CheckoutError;

/// Largest amount representable exactly as an integer in an `f64`.
const MAX_EXACT_AMOUNT: f64 = 9_007_199_254_740_991.0;

/// Rounds an amount to whole provider units and renders it as a string.
///
/// Halves round away from zero: `1999.5 -> "2000"`, `1999.6 -> "2000"`.
pub fn format_whole_units(amount: f64) -> Result<String, CheckoutError> {
    let rounded = checked_round(amount)?;
    Ok(format!("{}", rounded as i64))
}

/// Converts an amount in major units to the currency's minor units.
///
/// `19.99 USD -> 1999`, `500 JPY -> 500`.
pub fn to_minor_units(amount: f64, currency: &CurrencyCode) -> Result<i64, CheckoutError> {
    let scale = 10_f64.powi(currency.minor_unit_exponent() as i32);
    let rounded = checked_round(amount * scale).map_err(|_| {
        if amount.is_finite() && amount >= 0.0 {
            CheckoutError::AmountOutOfRange(amount)
        } else {
            CheckoutError::InvalidAmount(amount)
        }
    })?;
    Ok(rounded as i64)
}

fn checked_round(amount: f64) -> Result<f64, CheckoutError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CheckoutError::InvalidAmount(amount));
    }

    let rounded = amount.round();
    if rounded > MAX_EXACT_AMOUNT {
        return Err(CheckoutError::AmountOutOfRange(amount));
    }

    Ok(rounded)
}
