use std::str::FromStr;

use cosmwasm_std::{Addr, Coin, Decimal, Uint128};
use cw_multi_test::{App, Executor};

use crate::mock_cw20::{mock_cw20_contract, MockCw20InstantiateMsg};
use crate::mock_dira::{mock_dira_contract, MockDiraExecuteMsg, MockDiraInstantiateMsg};

/// Default test denom for collateral and fees
pub const COLLATERAL_DENOM: &str = "uom";

/// Default market: price 1, liquidation at 150%, fully healthy at 300%
pub const DEFAULT_PRICE: &str = "1";
pub const DEFAULT_LIQUIDATION_HEALTH: &str = "1.5";
pub const DEFAULT_MINTABLE_HEALTH: &str = "3";

/// Parse a decimal literal. Panics on malformed input; test use only.
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn default_instantiate_msg() -> MockDiraInstantiateMsg {
    MockDiraInstantiateMsg {
        collateral_denom: COLLATERAL_DENOM.to_string(),
        collateral_price: dec(DEFAULT_PRICE),
        liquidation_health: dec(DEFAULT_LIQUIDATION_HEALTH),
        mintable_health: dec(DEFAULT_MINTABLE_HEALTH),
    }
}

/// `whole` tokens of `denom` in micro units.
pub fn whole_coin(whole: u128, denom: &str) -> Coin {
    Coin {
        denom: denom.to_string(),
        amount: Uint128::new(whole * 1_000_000),
    }
}

/// Addresses of a deployed mock Dira contract and its token.
pub struct DiraContracts {
    pub dira: Addr,
    pub token: Addr,
}

/// Deploy the mock Dira contract and a CW20 token it mints, wired together.
pub fn instantiate_dira(app: &mut App, owner: &Addr, msg: MockDiraInstantiateMsg) -> DiraContracts {
    let dira_code_id = app.store_code(Box::new(mock_dira_contract()));
    let token_code_id = app.store_code(Box::new(mock_cw20_contract()));

    let dira = app
        .instantiate_contract(dira_code_id, owner.clone(), &msg, &[], "mock-dira", None)
        .unwrap();
    let token = app
        .instantiate_contract(
            token_code_id,
            owner.clone(),
            &MockCw20InstantiateMsg {
                minter: dira.to_string(),
                initial_balances: vec![],
            },
            &[],
            "mock-dira-token",
            None,
        )
        .unwrap();

    app.execute_contract(
        owner.clone(),
        dira.clone(),
        &MockDiraExecuteMsg::SetDiraToken {
            address: token.to_string(),
        },
        &[],
    )
    .unwrap();

    DiraContracts { dira, token }
}
