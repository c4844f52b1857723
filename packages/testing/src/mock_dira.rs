use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Binary, Coin, Decimal, Deps, DepsMut, Env, MessageInfo,
    Response, StdError, StdResult, WasmMsg,
};
use cw_storage_plus::{Item, Map};
use dira_types::{
    from_micro, to_micro, CollateralPriceResponse, CollateralTokenDenomResponse, Cw20ExecuteMsg,
    DiraQueryMsg, LiquidationHealthResponse, LockedCollateralResponse, MintableHealthResponse,
    MintedDiraResponse, TOKEN_DECIMALS,
};

#[cw_serde]
pub struct MockDiraConfig {
    pub collateral_denom: String,
    pub collateral_price: Decimal,
    pub liquidation_health: Decimal,
    pub mintable_health: Decimal,
    pub dira_token: Option<Addr>,
    pub paused: bool,
}

pub const CONFIG: Item<MockDiraConfig> = Item::new("config");
/// Whole-unit collateral locked per account
pub const LOCKED: Map<&Addr, Decimal> = Map::new("locked");
/// Whole-unit Dira minted per account
pub const MINTED: Map<&Addr, Decimal> = Map::new("minted");

#[cw_serde]
pub struct MockDiraInstantiateMsg {
    pub collateral_denom: String,
    pub collateral_price: Decimal,
    pub liquidation_health: Decimal,
    pub mintable_health: Decimal,
}

/// The Dira execute interface plus test controls.
#[cw_serde]
pub enum MockDiraExecuteMsg {
    LockCollateral {},
    UnlockCollateral { collateral_amount_to_unlock: Decimal },
    MintDira { dira_to_mint: Decimal },
    BurnDira { dira_to_burn: Decimal },
    SetCollateralPrice { price: Decimal },
    SetDiraToken { address: String },
    /// Reject every position change while set
    SetPaused { paused: bool },
}

fn std_err(err: impl ToString) -> StdError {
    StdError::generic_err(err.to_string())
}

/// Largest debt `collateral` can carry at the mintable ratio.
fn debt_capacity(config: &MockDiraConfig, collateral: Decimal) -> StdResult<Decimal> {
    collateral
        .checked_mul(config.collateral_price)
        .map_err(std_err)?
        .checked_div(config.mintable_health)
        .map_err(std_err)
}

pub fn mock_dira_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: MockDiraInstantiateMsg,
) -> StdResult<Response> {
    CONFIG.save(
        deps.storage,
        &MockDiraConfig {
            collateral_denom: msg.collateral_denom,
            collateral_price: msg.collateral_price,
            liquidation_health: msg.liquidation_health,
            mintable_health: msg.mintable_health,
            dira_token: None,
            paused: false,
        },
    )?;
    Ok(Response::new().add_attribute("action", "instantiate_mock_dira"))
}

pub fn mock_dira_execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: MockDiraExecuteMsg,
) -> StdResult<Response> {
    let mut config = CONFIG.load(deps.storage)?;
    let is_position_change = matches!(
        msg,
        MockDiraExecuteMsg::LockCollateral {}
            | MockDiraExecuteMsg::UnlockCollateral { .. }
            | MockDiraExecuteMsg::MintDira { .. }
            | MockDiraExecuteMsg::BurnDira { .. }
    );
    if config.paused && is_position_change {
        return Err(StdError::generic_err("contract is paused"));
    }

    let sender = info.sender.clone();
    let locked = LOCKED.may_load(deps.storage, &sender)?.unwrap_or_default();
    let minted = MINTED.may_load(deps.storage, &sender)?.unwrap_or_default();

    match msg {
        MockDiraExecuteMsg::LockCollateral {} => {
            let micro = cw_utils::must_pay(&info, &config.collateral_denom).map_err(std_err)?;
            let amount = from_micro(micro, TOKEN_DECIMALS).map_err(std_err)?;
            LOCKED.save(deps.storage, &sender, &(locked + amount))?;
            Ok(Response::new()
                .add_attribute("action", "lock_collateral")
                .add_attribute("amount", amount.to_string()))
        }
        MockDiraExecuteMsg::UnlockCollateral {
            collateral_amount_to_unlock,
        } => {
            let remaining = locked
                .checked_sub(collateral_amount_to_unlock)
                .map_err(|_| StdError::generic_err("not enough collateral locked"))?;
            if minted > debt_capacity(&config, remaining)? {
                return Err(StdError::generic_err("unlock would undercollateralize position"));
            }
            LOCKED.save(deps.storage, &sender, &remaining)?;

            let refund = Coin {
                denom: config.collateral_denom,
                amount: to_micro(collateral_amount_to_unlock, TOKEN_DECIMALS).map_err(std_err)?,
            };
            Ok(Response::new()
                .add_message(BankMsg::Send {
                    to_address: sender.to_string(),
                    amount: vec![refund],
                })
                .add_attribute("action", "unlock_collateral")
                .add_attribute("amount", collateral_amount_to_unlock.to_string()))
        }
        MockDiraExecuteMsg::MintDira { dira_to_mint } => {
            let token = config
                .dira_token
                .clone()
                .ok_or_else(|| StdError::generic_err("dira token not set"))?;
            let new_minted = minted + dira_to_mint;
            if new_minted > debt_capacity(&config, locked)? {
                return Err(StdError::generic_err("mint exceeds mintable health"));
            }
            MINTED.save(deps.storage, &sender, &new_minted)?;

            let mint = Cw20ExecuteMsg::Mint {
                recipient: sender.to_string(),
                amount: to_micro(dira_to_mint, TOKEN_DECIMALS).map_err(std_err)?,
            };
            Ok(Response::new()
                .add_message(WasmMsg::Execute {
                    contract_addr: token.to_string(),
                    msg: to_json_binary(&mint)?,
                    funds: vec![],
                })
                .add_attribute("action", "mint_dira")
                .add_attribute("amount", dira_to_mint.to_string()))
        }
        MockDiraExecuteMsg::BurnDira { dira_to_burn } => {
            let token = config
                .dira_token
                .clone()
                .ok_or_else(|| StdError::generic_err("dira token not set"))?;
            let remaining = minted
                .checked_sub(dira_to_burn)
                .map_err(|_| StdError::generic_err("burn exceeds minted dira"))?;
            MINTED.save(deps.storage, &sender, &remaining)?;

            // Pulls from the sender's allowance to this contract
            let burn = Cw20ExecuteMsg::BurnFrom {
                owner: sender.to_string(),
                amount: to_micro(dira_to_burn, TOKEN_DECIMALS).map_err(std_err)?,
            };
            Ok(Response::new()
                .add_message(WasmMsg::Execute {
                    contract_addr: token.to_string(),
                    msg: to_json_binary(&burn)?,
                    funds: vec![],
                })
                .add_attribute("action", "burn_dira")
                .add_attribute("amount", dira_to_burn.to_string()))
        }
        MockDiraExecuteMsg::SetCollateralPrice { price } => {
            config.collateral_price = price;
            CONFIG.save(deps.storage, &config)?;
            Ok(Response::new()
                .add_attribute("action", "set_collateral_price")
                .add_attribute("price", price.to_string()))
        }
        MockDiraExecuteMsg::SetDiraToken { address } => {
            config.dira_token = Some(deps.api.addr_validate(&address)?);
            CONFIG.save(deps.storage, &config)?;
            Ok(Response::new().add_attribute("action", "set_dira_token"))
        }
        MockDiraExecuteMsg::SetPaused { paused } => {
            config.paused = paused;
            CONFIG.save(deps.storage, &config)?;
            Ok(Response::new().add_attribute("action", "set_paused"))
        }
    }
}

pub fn mock_dira_query(deps: Deps, _env: Env, msg: DiraQueryMsg) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    match msg {
        DiraQueryMsg::QueryCollateralPrice {} => to_json_binary(&CollateralPriceResponse {
            collateral_price: config.collateral_price,
        }),
        DiraQueryMsg::QueryLockedCollateral {
            wallet_address_to_query,
        } => {
            let address = deps.api.addr_validate(&wallet_address_to_query)?;
            to_json_binary(&LockedCollateralResponse {
                collateral_locked: LOCKED.may_load(deps.storage, &address)?.unwrap_or_default(),
            })
        }
        DiraQueryMsg::QueryMintedDira {
            wallet_address_to_query,
        } => {
            let address = deps.api.addr_validate(&wallet_address_to_query)?;
            to_json_binary(&MintedDiraResponse {
                dira_minted: MINTED.may_load(deps.storage, &address)?.unwrap_or_default(),
            })
        }
        DiraQueryMsg::QueryLiquidationHealth {} => to_json_binary(&LiquidationHealthResponse {
            liquidation_health: config.liquidation_health,
        }),
        DiraQueryMsg::QueryMintableHealth {} => to_json_binary(&MintableHealthResponse {
            mintable_health: config.mintable_health,
        }),
        DiraQueryMsg::QueryCollateralTokenDenom {} => {
            to_json_binary(&CollateralTokenDenomResponse {
                collateral_token_denom: config.collateral_denom,
            })
        }
    }
}

/// Helper to create a mock Dira contract for cw-multi-test.
pub fn mock_dira_contract() -> cw_multi_test::ContractWrapper<
    MockDiraExecuteMsg,
    MockDiraInstantiateMsg,
    DiraQueryMsg,
    StdError,
    StdError,
    StdError,
> {
    cw_multi_test::ContractWrapper::new(mock_dira_execute, mock_dira_instantiate, mock_dira_query)
}
