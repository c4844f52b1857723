use std::str::FromStr;

use cosmwasm_std::{Decimal, Decimal256, Uint128};

use crate::error::DiraError;

/// Decimal places of the on-chain collateral and Dira tokens (micro units).
pub const TOKEN_DECIMALS: u32 = 6;

/// Number of atomics of a `Decimal` that make up one step at `places` precision.
fn step_atomics(places: u32) -> Result<u128, DiraError> {
    if places > Decimal::DECIMAL_PLACES {
        return Err(DiraError::UnsupportedPrecision { precision: places });
    }
    Ok(10u128.pow(Decimal::DECIMAL_PLACES - places))
}

/// Convert a whole-unit amount into the token's smallest unit, rounding down.
/// 1.5 OM with 6 decimals => 1_500_000 uom
pub fn to_micro(amount: Decimal, decimals: u32) -> Result<Uint128, DiraError> {
    let step = step_atomics(decimals)?;
    Ok(Uint128::new(amount.atomics().u128() / step))
}

/// Convert an amount in the token's smallest unit into whole units.
pub fn from_micro(amount: Uint128, decimals: u32) -> Result<Decimal, DiraError> {
    step_atomics(decimals)?;
    Ok(Decimal::from_atomics(amount, decimals)?)
}

/// Round to `places` fractional digits, half away from zero.
pub fn round_to_precision(value: Decimal, places: u32) -> Result<Decimal, DiraError> {
    let step = step_atomics(places)?;
    let atomics = value.atomics().checked_add(Uint128::new(step / 2))?;
    Ok(Decimal::raw(atomics.u128() / step * step))
}

/// Truncate to `places` fractional digits. Never exceeds `value`.
pub fn floor_to_precision(value: Decimal, places: u32) -> Result<Decimal, DiraError> {
    let step = step_atomics(places)?;
    Ok(Decimal::raw(value.atomics().u128() / step * step))
}

/// Format with exactly `places` fractional digits (half-up), e.g. `12.500000`.
pub fn format_fixed(value: Decimal, places: u32) -> Result<String, DiraError> {
    let step = step_atomics(places)?;
    let rounded = round_to_precision(value, places)?.atomics().u128();
    let one = 10u128.pow(Decimal::DECIMAL_PLACES);
    let whole = rounded / one;
    if places == 0 {
        return Ok(whole.to_string());
    }
    let fractional = (rounded % one) / step;
    Ok(format!(
        "{whole}.{fractional:0>width$}",
        width = places as usize
    ))
}

/// Parse user-typed amount text.
/// Accepts digits and a single `.`; an empty whole or fractional part is read
/// as zero so partially typed values ("", ".", "1.", ".5") are valid.
pub fn parse_amount_input(input: &str, precision: u32) -> Result<Decimal, DiraError> {
    step_atomics(precision)?;

    let well_formed =
        input.chars().all(|c| c.is_ascii_digit() || c == '.') && input.matches('.').count() <= 1;
    if !well_formed {
        return Err(DiraError::InvalidAmount {
            input: input.to_string(),
        });
    }

    let (whole, fractional) = input.split_once('.').unwrap_or((input, ""));
    if fractional.len() > precision as usize {
        return Err(DiraError::TooManyDecimals { max: precision });
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fractional.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fractional}")
    };

    Decimal::from_str(&normalized).map_err(|_| DiraError::InvalidAmount {
        input: input.to_string(),
    })
}

/// Widen for intermediate products that may not fit in `Decimal`.
pub fn decimal_to_decimal256(decimal: Decimal) -> Decimal256 {
    Decimal256::from(decimal)
}

/// Narrow back to `Decimal`, failing if the value is out of range.
pub fn decimal256_to_decimal(value: Decimal256) -> Result<Decimal, DiraError> {
    Decimal::try_from(value).map_err(|_| DiraError::MathOverflow {
        reason: "Decimal256 value too large for Decimal".to_string(),
    })
}
