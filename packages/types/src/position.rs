use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;

/// Confirmed position of the connected account, in whole token units.
#[cw_serde]
#[derive(Default)]
pub struct Position {
    /// Collateral locked in the Dira contract
    pub locked_collateral: Decimal,
    /// Dira minted against the collateral
    pub minted_debt: Decimal,
}

impl Position {
    pub fn new(locked_collateral: Decimal, minted_debt: Decimal) -> Self {
        Self {
            locked_collateral,
            minted_debt,
        }
    }
}

/// Market-wide parameters read from the Dira contract.
#[cw_serde]
#[derive(Default)]
pub struct MarketParameters {
    /// Price of one collateral token in Dira
    pub collateral_price: Decimal,
    /// Collateralization ratio below which a position can be liquidated (e.g. 1.5)
    pub liquidation_ratio: Decimal,
    /// Collateralization ratio at or above which a position is fully healthy (e.g. 3.0)
    pub safe_ratio: Decimal,
}

impl MarketParameters {
    /// Thresholds that cannot express a health range, or no usable price.
    /// Health is reported as always safe in that case.
    pub fn is_degenerate(&self) -> bool {
        self.liquidation_ratio >= self.safe_ratio || self.collateral_price.is_zero()
    }
}

/// Everything one refresh reads from chain for the connected account.
#[cw_serde]
#[derive(Default)]
pub struct MarketSnapshot {
    pub position: Position,
    pub params: MarketParameters,
    /// Collateral token held in the wallet (whole units)
    pub wallet_balance: Decimal,
    /// Denom the contract accepts as collateral
    pub collateral_denom: String,
}

/// Direction of a pending change to a tracked quantity.
#[cw_serde]
#[derive(Copy, Default)]
pub enum AdjustMode {
    /// Lock collateral / mint Dira
    #[default]
    Add,
    /// Unlock collateral / return Dira
    Remove,
}

/// A not yet submitted change to one tracked quantity.
#[cw_serde]
pub struct PendingAdjustment {
    pub mode: AdjustMode,
    pub amount: Decimal,
}
