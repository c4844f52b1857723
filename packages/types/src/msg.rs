use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Decimal, Uint128};
use cw_utils::Expiration;

// ============================================================================
// Dira Contract Messages
// ============================================================================

/// Execute interface of the Dira collateral contract.
/// Amounts are whole-unit decimals; collateral is attached as funds.
#[cw_serde]
pub enum DiraExecuteMsg {
    /// Lock the attached collateral funds
    LockCollateral {},

    /// Return locked collateral to the sender
    UnlockCollateral {
        collateral_amount_to_unlock: Decimal,
    },

    /// Mint Dira against locked collateral
    MintDira { dira_to_mint: Decimal },

    /// Burn Dira previously approved via CW20 allowance
    BurnDira { dira_to_burn: Decimal },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum DiraQueryMsg {
    #[returns(CollateralPriceResponse)]
    QueryCollateralPrice {},

    #[returns(LockedCollateralResponse)]
    QueryLockedCollateral { wallet_address_to_query: String },

    #[returns(MintedDiraResponse)]
    QueryMintedDira { wallet_address_to_query: String },

    /// Liquidation ratio
    #[returns(LiquidationHealthResponse)]
    QueryLiquidationHealth {},

    /// Safe (mintable) ratio
    #[returns(MintableHealthResponse)]
    QueryMintableHealth {},

    #[returns(CollateralTokenDenomResponse)]
    QueryCollateralTokenDenom {},
}

#[cw_serde]
pub struct CollateralPriceResponse {
    pub collateral_price: Decimal,
}

#[cw_serde]
pub struct LockedCollateralResponse {
    pub collateral_locked: Decimal,
}

#[cw_serde]
pub struct MintedDiraResponse {
    pub dira_minted: Decimal,
}

#[cw_serde]
pub struct LiquidationHealthResponse {
    pub liquidation_health: Decimal,
}

#[cw_serde]
pub struct MintableHealthResponse {
    pub mintable_health: Decimal,
}

#[cw_serde]
pub struct CollateralTokenDenomResponse {
    pub collateral_token_denom: String,
}

// ============================================================================
// Dira Token (CW20) Messages
// ============================================================================

/// The subset of the CW20 interface the dashboard and its test doubles use.
/// Amounts are in micro units.
#[cw_serde]
pub enum Cw20ExecuteMsg {
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    BurnFrom {
        owner: String,
        amount: Uint128,
    },
    Mint {
        recipient: String,
        amount: Uint128,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum Cw20QueryMsg {
    #[returns(Cw20BalanceResponse)]
    Balance { address: String },

    #[returns(Cw20AllowanceResponse)]
    Allowance { owner: String, spender: String },
}

#[cw_serde]
pub struct Cw20BalanceResponse {
    pub balance: Uint128,
}

#[cw_serde]
pub struct Cw20AllowanceResponse {
    pub allowance: Uint128,
    pub expires: Expiration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::{from_json, to_json_string};

    #[test]
    fn test_query_msg_wire_format() {
        let json = to_json_string(&DiraQueryMsg::QueryLockedCollateral {
            wallet_address_to_query: "mantra1abc".to_string(),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"query_locked_collateral":{"wallet_address_to_query":"mantra1abc"}}"#
        );

        let json = to_json_string(&DiraQueryMsg::QueryCollateralPrice {}).unwrap();
        assert_eq!(json, r#"{"query_collateral_price":{}}"#);
    }

    #[test]
    fn test_execute_msg_wire_format() {
        let json = to_json_string(&DiraExecuteMsg::BurnDira {
            dira_to_burn: Decimal::percent(1250),
        })
        .unwrap();
        assert_eq!(json, r#"{"burn_dira":{"dira_to_burn":"12.5"}}"#);

        let json = to_json_string(&DiraExecuteMsg::LockCollateral {}).unwrap();
        assert_eq!(json, r#"{"lock_collateral":{}}"#);
    }

    #[test]
    fn test_increase_allowance_never_expires() {
        let json = to_json_string(&Cw20ExecuteMsg::IncreaseAllowance {
            spender: "dira".to_string(),
            amount: Uint128::new(5_000_000),
            expires: Some(Expiration::Never {}),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"increase_allowance":{"spender":"dira","amount":"5000000","expires":{"never":{}}}}"#
        );
    }

    #[test]
    fn test_price_response_parses_decimal_string() {
        let parsed: CollateralPriceResponse =
            from_json(r#"{"collateral_price":"0.245"}"#).unwrap();
        assert_eq!(parsed.collateral_price, Decimal::permille(245));
    }
}
