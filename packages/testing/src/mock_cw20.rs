use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdError,
    StdResult, Uint128,
};
use cw_storage_plus::{Item, Map};
use cw_utils::Expiration;
use dira_types::{Cw20AllowanceResponse, Cw20BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

pub const MINTER: Item<Addr> = Item::new("minter");
pub const BALANCES: Map<&Addr, Uint128> = Map::new("balances");
/// (owner, spender) -> allowance
pub const ALLOWANCES: Map<(&Addr, &Addr), Uint128> = Map::new("allowances");

#[cw_serde]
pub struct MockCw20InstantiateMsg {
    pub minter: String,
    pub initial_balances: Vec<(String, Uint128)>,
}

/// Minimal CW20 token: balances, allowances, minting and burn-from.
/// Allowances never expire.
pub fn mock_cw20_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: MockCw20InstantiateMsg,
) -> StdResult<Response> {
    MINTER.save(deps.storage, &deps.api.addr_validate(&msg.minter)?)?;
    for (address, amount) in msg.initial_balances {
        let address = deps.api.addr_validate(&address)?;
        BALANCES.save(deps.storage, &address, &amount)?;
    }
    Ok(Response::new().add_attribute("action", "instantiate_mock_cw20"))
}

pub fn mock_cw20_execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: Cw20ExecuteMsg,
) -> StdResult<Response> {
    match msg {
        Cw20ExecuteMsg::IncreaseAllowance {
            spender, amount, ..
        } => {
            let spender = deps.api.addr_validate(&spender)?;
            ALLOWANCES.update(deps.storage, (&info.sender, &spender), |current| {
                current.unwrap_or_default().checked_add(amount).map_err(StdError::from)
            })?;
            Ok(Response::new()
                .add_attribute("action", "increase_allowance")
                .add_attribute("owner", info.sender)
                .add_attribute("spender", spender)
                .add_attribute("amount", amount))
        }
        Cw20ExecuteMsg::BurnFrom { owner, amount } => {
            let owner = deps.api.addr_validate(&owner)?;
            ALLOWANCES.update(deps.storage, (&owner, &info.sender), |current| {
                current
                    .unwrap_or_default()
                    .checked_sub(amount)
                    .map_err(|_| StdError::generic_err("insufficient allowance"))
            })?;
            BALANCES.update(deps.storage, &owner, |current| {
                current
                    .unwrap_or_default()
                    .checked_sub(amount)
                    .map_err(|_| StdError::generic_err("insufficient balance"))
            })?;
            Ok(Response::new()
                .add_attribute("action", "burn_from")
                .add_attribute("owner", owner)
                .add_attribute("amount", amount))
        }
        Cw20ExecuteMsg::Mint { recipient, amount } => {
            if info.sender != MINTER.load(deps.storage)? {
                return Err(StdError::generic_err("unauthorized"));
            }
            let recipient = deps.api.addr_validate(&recipient)?;
            BALANCES.update(deps.storage, &recipient, |current| {
                current.unwrap_or_default().checked_add(amount).map_err(StdError::from)
            })?;
            Ok(Response::new()
                .add_attribute("action", "mint")
                .add_attribute("recipient", recipient)
                .add_attribute("amount", amount))
        }
    }
}

pub fn mock_cw20_query(deps: Deps, _env: Env, msg: Cw20QueryMsg) -> StdResult<Binary> {
    match msg {
        Cw20QueryMsg::Balance { address } => {
            let address = deps.api.addr_validate(&address)?;
            let balance = BALANCES
                .may_load(deps.storage, &address)?
                .unwrap_or_default();
            to_json_binary(&Cw20BalanceResponse { balance })
        }
        Cw20QueryMsg::Allowance { owner, spender } => {
            let owner = deps.api.addr_validate(&owner)?;
            let spender = deps.api.addr_validate(&spender)?;
            let allowance = ALLOWANCES
                .may_load(deps.storage, (&owner, &spender))?
                .unwrap_or_default();
            to_json_binary(&Cw20AllowanceResponse {
                allowance,
                expires: Expiration::Never {},
            })
        }
    }
}

/// Helper to create a mock CW20 contract for cw-multi-test.
pub fn mock_cw20_contract() -> cw_multi_test::ContractWrapper<
    Cw20ExecuteMsg,
    MockCw20InstantiateMsg,
    Cw20QueryMsg,
    StdError,
    StdError,
    StdError,
> {
    cw_multi_test::ContractWrapper::new(mock_cw20_execute, mock_cw20_instantiate, mock_cw20_query)
}
