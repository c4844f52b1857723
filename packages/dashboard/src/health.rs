use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Decimal256};

use dira_types::{decimal256_to_decimal, decimal_to_decimal256, MarketParameters, Position};

use crate::adjust::Limits;
use crate::error::DashboardResult;

/// Collateralization of a position.
#[cw_serde]
pub struct Health {
    /// collateral_value / debt. `None` when there is no debt or the
    /// thresholds are degenerate (always safe).
    pub ratio: Option<Decimal256>,
    /// Distance between the liquidation and safe ratios, normalized to 0..=100
    pub percentage: Decimal,
}

impl Health {
    pub fn always_safe() -> Self {
        Self {
            ratio: None,
            percentage: hundred(),
        }
    }

    /// Ratio expressed as a percentage for display (1.5 => 150).
    /// `None` is shown as "N/A".
    pub fn collateralization_percent(&self) -> DashboardResult<Option<Decimal256>> {
        match self.ratio {
            Some(ratio) => Ok(Some(ratio.checked_mul(hundred256())?)),
            None => Ok(None),
        }
    }
}

fn hundred() -> Decimal {
    Decimal::from_ratio(100u128, 1u128)
}

fn hundred256() -> Decimal256 {
    Decimal256::from_ratio(100u128, 1u128)
}

/// Compute collateralization ratio and normalized health.
///
/// percentage = clamp((ratio - liquidation_ratio) / (safe_ratio - liquidation_ratio) * 100, 0, 100)
///
/// Products are taken in `Decimal256`; an overflow is an error, never a wrap.
pub fn compute_health(
    collateral: Decimal,
    debt: Decimal,
    price: Decimal,
    liquidation_ratio: Decimal,
    safe_ratio: Decimal,
) -> DashboardResult<Health> {
    let params = MarketParameters {
        collateral_price: price,
        liquidation_ratio,
        safe_ratio,
    };
    if params.is_degenerate() {
        return Ok(Health::always_safe());
    }

    let collateral_value =
        decimal_to_decimal256(collateral).checked_mul(decimal_to_decimal256(price))?;

    if debt.is_zero() {
        return Ok(Health::always_safe());
    }

    let ratio = collateral_value.checked_div(decimal_to_decimal256(debt))?;
    let liquidation = decimal_to_decimal256(liquidation_ratio);
    let safe = decimal_to_decimal256(safe_ratio);

    let percentage = if ratio <= liquidation {
        Decimal::zero()
    } else {
        let span = safe.checked_sub(liquidation)?;
        let excess = ratio.checked_sub(liquidation)?;
        if excess >= span {
            hundred()
        } else {
            decimal256_to_decimal(excess.checked_div(span)?.checked_mul(hundred256())?)?
        }
    };

    Ok(Health {
        ratio: Some(ratio),
        percentage,
    })
}

/// Health of `position` under `params`.
pub fn position_health(position: &Position, params: &MarketParameters) -> DashboardResult<Health> {
    compute_health(
        position.locked_collateral,
        position.minted_debt,
        params.collateral_price,
        params.liquidation_ratio,
        params.safe_ratio,
    )
}

/// Limits derived from the confirmed position, recomputed on every refresh.
#[cw_serde]
#[derive(Default)]
pub struct Ceilings {
    /// Collateral that can still be locked
    pub wallet_balance: Decimal,
    /// Total Dira the locked collateral supports at the safe ratio
    pub max_mintable_debt: Decimal,
    /// max(0, max_mintable_debt - minted)
    pub mintable_remaining: Decimal,
    /// Collateral that can be unlocked while staying at the safe ratio
    pub max_withdrawable_collateral: Decimal,
    /// Dira that can be returned
    pub returnable_debt: Decimal,
}

impl Ceilings {
    pub fn derive(
        position: &Position,
        params: &MarketParameters,
        wallet_balance: Decimal,
    ) -> DashboardResult<Self> {
        let max_mintable_debt = max_mintable_debt(position, params)?;
        Ok(Self {
            wallet_balance,
            max_mintable_debt,
            mintable_remaining: max_mintable_debt.saturating_sub(position.minted_debt),
            max_withdrawable_collateral: max_withdrawable_collateral(position, params)?,
            returnable_debt: position.minted_debt,
        })
    }

    /// Lock is bounded by the wallet, unlock by what the safe ratio frees.
    pub fn collateral_limits(&self) -> Limits {
        Limits {
            add: self.wallet_balance,
            remove: self.max_withdrawable_collateral,
        }
    }

    /// Mint is bounded by the remaining capacity, return by the minted amount.
    pub fn debt_limits(&self) -> Limits {
        Limits {
            add: self.mintable_remaining,
            remove: self.returnable_debt,
        }
    }
}

/// locked * price / safe_ratio, or zero without a usable price or ratio.
pub fn max_mintable_debt(position: &Position, params: &MarketParameters) -> DashboardResult<Decimal> {
    if params.safe_ratio.is_zero() || params.collateral_price.is_zero() {
        return Ok(Decimal::zero());
    }

    let value = decimal_to_decimal256(position.locked_collateral)
        .checked_mul(decimal_to_decimal256(params.collateral_price))?;
    let mintable = value.checked_div(decimal_to_decimal256(params.safe_ratio))?;
    Ok(decimal256_to_decimal(mintable)?)
}

/// max(0, locked - debt * safe_ratio / price). All collateral is withdrawable
/// without debt or without a usable price or ratio.
pub fn max_withdrawable_collateral(
    position: &Position,
    params: &MarketParameters,
) -> DashboardResult<Decimal> {
    if params.safe_ratio.is_zero()
        || params.collateral_price.is_zero()
        || position.minted_debt.is_zero()
    {
        return Ok(position.locked_collateral);
    }

    let required = decimal_to_decimal256(position.minted_debt)
        .checked_mul(decimal_to_decimal256(params.safe_ratio))?
        .checked_div(decimal_to_decimal256(params.collateral_price))?;
    let locked = decimal_to_decimal256(position.locked_collateral);

    if required >= locked {
        return Ok(Decimal::zero());
    }
    Ok(decimal256_to_decimal(locked.checked_sub(required)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn dec256(s: &str) -> Decimal256 {
        Decimal256::from_str(s).unwrap()
    }

    fn params(price: &str) -> MarketParameters {
        MarketParameters {
            collateral_price: dec(price),
            liquidation_ratio: dec("1.5"),
            safe_ratio: dec("3.0"),
        }
    }

    #[test]
    fn test_health_capped_at_hundred() {
        // 120 collateral at 5 = 600 value, 50 debt => ratio 12
        let health = compute_health(dec("120"), dec("50"), dec("5"), dec("1.5"), dec("3")).unwrap();
        assert_eq!(health.ratio, Some(dec256("12")));
        assert_eq!(health.percentage, dec("100"));
    }

    #[test]
    fn test_health_floored_at_zero() {
        // 20 collateral at 1 = 20 value, 50 debt => ratio 0.4, below liquidation
        let health = compute_health(dec("20"), dec("50"), dec("1"), dec("1.5"), dec("3")).unwrap();
        assert_eq!(health.ratio, Some(dec256("0.4")));
        assert_eq!(health.percentage, Decimal::zero());
    }

    #[test]
    fn test_health_inside_range() {
        // ratio 2.25 => (2.25 - 1.5) / 1.5 * 100 = 50
        let health = compute_health(dec("45"), dec("20"), dec("1"), dec("1.5"), dec("3")).unwrap();
        assert_eq!(health.ratio, Some(dec256("2.25")));
        assert_eq!(health.percentage, dec("50"));
    }

    #[test]
    fn test_health_at_thresholds() {
        // Exactly at liquidation ratio => 0
        let health = compute_health(dec("15"), dec("10"), dec("1"), dec("1.5"), dec("3")).unwrap();
        assert_eq!(health.percentage, Decimal::zero());

        // Exactly at safe ratio => 100
        let health = compute_health(dec("30"), dec("10"), dec("1"), dec("1.5"), dec("3")).unwrap();
        assert_eq!(health.percentage, dec("100"));
    }

    #[test]
    fn test_no_debt_is_always_safe() {
        for collateral in ["0", "1", "1000000"] {
            let health =
                compute_health(dec(collateral), Decimal::zero(), dec("2"), dec("1.5"), dec("3"))
                    .unwrap();
            assert_eq!(health, Health::always_safe());
        }
    }

    #[test]
    fn test_degenerate_thresholds_always_safe() {
        // liquidation ratio >= safe ratio
        let health = compute_health(dec("1"), dec("100"), dec("1"), dec("3"), dec("3")).unwrap();
        assert_eq!(health, Health::always_safe());
        let health = compute_health(dec("1"), dec("100"), dec("1"), dec("4"), dec("3")).unwrap();
        assert_eq!(health, Health::always_safe());

        // zero price
        let health = compute_health(dec("1"), dec("100"), Decimal::zero(), dec("1.5"), dec("3"))
            .unwrap();
        assert_eq!(health, Health::always_safe());
    }

    #[test]
    fn test_degenerate_market_always_safe() {
        let position = Position::new(dec("1"), dec("100"));
        let unset = MarketParameters::default();
        assert!(unset.is_degenerate());
        assert_eq!(
            position_health(&position, &unset).unwrap(),
            Health::always_safe()
        );

        let inverted = MarketParameters {
            liquidation_ratio: dec("3"),
            safe_ratio: dec("1.5"),
            ..params("1")
        };
        assert!(inverted.is_degenerate());
        assert_eq!(
            position_health(&position, &inverted).unwrap(),
            Health::always_safe()
        );
        assert_ne!(
            position_health(&position, &params("1")).unwrap(),
            Health::always_safe()
        );
    }

    #[test]
    fn test_health_monotonic_in_collateral_and_debt() {
        let amounts = ["0", "1", "7.5", "20", "33.3", "45", "60", "150", "10000"];
        let debts = ["0.5", "5", "20", "33", "100"];

        for debt in debts {
            let mut previous = Decimal::zero();
            for collateral in amounts {
                let health =
                    compute_health(dec(collateral), dec(debt), dec("1.2"), dec("1.5"), dec("3"))
                        .unwrap();
                assert!(health.percentage <= dec("100"));
                assert!(
                    health.percentage >= previous,
                    "health fell when collateral rose to {collateral} (debt {debt})"
                );
                previous = health.percentage;
            }
        }

        for collateral in amounts {
            let mut previous = dec("100");
            for debt in debts {
                let health =
                    compute_health(dec(collateral), dec(debt), dec("1.2"), dec("1.5"), dec("3"))
                        .unwrap();
                assert!(
                    health.percentage <= previous,
                    "health rose when debt rose to {debt} (collateral {collateral})"
                );
                previous = health.percentage;
            }
        }
    }

    #[test]
    fn test_extreme_ratio_display_overflow() {
        // Dust debt against the largest representable value still computes
        let price = dec("100000000000000000000");
        let health =
            compute_health(Decimal::MAX, Decimal::raw(1), price, dec("1.5"), dec("3")).unwrap();
        assert_eq!(health.percentage, dec("100"));
        // but cannot be scaled to a percentage for display
        assert!(health.collateralization_percent().is_err());
    }

    #[test]
    fn test_collateralization_percent() {
        let health = compute_health(dec("45"), dec("20"), dec("1"), dec("1.5"), dec("3")).unwrap();
        assert_eq!(health.collateralization_percent().unwrap(), Some(dec256("225")));
        assert_eq!(Health::always_safe().collateralization_percent().unwrap(), None);
    }

    #[test]
    fn test_max_mintable_debt() {
        let position = Position::new(dec("120"), dec("50"));
        // 120 * 5 / 3 = 200
        assert_eq!(max_mintable_debt(&position, &params("5")).unwrap(), dec("200"));
        assert_eq!(max_mintable_debt(&position, &params("0")).unwrap(), Decimal::zero());

        let no_ratio = MarketParameters {
            safe_ratio: Decimal::zero(),
            ..params("5")
        };
        assert_eq!(max_mintable_debt(&position, &no_ratio).unwrap(), Decimal::zero());
    }

    #[test]
    fn test_max_withdrawable_collateral() {
        // 50 debt * 3 / 5 = 30 required, 120 - 30 = 90 free
        let position = Position::new(dec("120"), dec("50"));
        assert_eq!(
            max_withdrawable_collateral(&position, &params("5")).unwrap(),
            dec("90")
        );

        // Underwater position frees nothing
        let position = Position::new(dec("20"), dec("50"));
        assert_eq!(
            max_withdrawable_collateral(&position, &params("1")).unwrap(),
            Decimal::zero()
        );

        // No debt frees everything
        let position = Position::new(dec("20"), Decimal::zero());
        assert_eq!(
            max_withdrawable_collateral(&position, &params("1")).unwrap(),
            dec("20")
        );
    }

    #[test]
    fn test_ceilings_limits() {
        let position = Position::new(dec("120"), dec("50"));
        let ceilings = Ceilings::derive(&position, &params("5"), dec("80")).unwrap();

        assert_eq!(ceilings.max_mintable_debt, dec("200"));
        assert_eq!(ceilings.mintable_remaining, dec("150"));

        let collateral = ceilings.collateral_limits();
        assert_eq!(collateral.add, dec("80"));
        assert_eq!(collateral.remove, dec("90"));

        let debt = ceilings.debt_limits();
        assert_eq!(debt.add, dec("150"));
        assert_eq!(debt.remove, dec("50"));
    }

    #[test]
    fn test_mintable_remaining_never_negative() {
        // Price dropped: 100 * 1 / 3 = 33.3.. mintable, 50 already minted
        let position = Position::new(dec("100"), dec("50"));
        let ceilings = Ceilings::derive(&position, &params("1"), Decimal::zero()).unwrap();
        assert_eq!(ceilings.mintable_remaining, Decimal::zero());
    }
}
