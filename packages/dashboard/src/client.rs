use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Binary, Coin, CosmosMsg, Decimal, WasmMsg};
use cw_utils::Expiration;
use serde::{de::DeserializeOwned, Serialize};

use dira_types::{
    from_micro, to_micro, CollateralPriceResponse, CollateralTokenDenomResponse,
    Cw20ExecuteMsg, DiraExecuteMsg, DiraQueryMsg, LiquidationHealthResponse,
    LockedCollateralResponse, MarketParameters, MarketSnapshot, MintableHealthResponse,
    MintedDiraResponse, Position,
};

use crate::config::DashboardConfig;
use crate::error::DashboardResult;
use crate::orchestrator::Action;

/// Read access to the chain. Implemented by the host over RPC, and in tests
/// over a multi-test `App`.
pub trait ChainQuerier {
    fn query_smart<M: Serialize, T: DeserializeOwned>(
        &self,
        contract: &str,
        msg: &M,
    ) -> DashboardResult<T>;

    /// Bank balance of `address` in `denom`, in micro units.
    fn query_balance(&self, address: &str, denom: &str) -> DashboardResult<Coin>;
}

/// Signs and broadcasts one contract execution on behalf of `sender`.
pub trait SigningClient {
    fn execute(&mut self, sender: &str, request: &TxRequest) -> DashboardResult<()>;
}

#[cw_serde]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: u64,
}

/// A single contract execution ready to be signed.
#[cw_serde]
pub struct TxRequest {
    pub contract: String,
    pub msg: Binary,
    pub funds: Vec<Coin>,
    pub fee: StdFee,
}

impl TxRequest {
    fn new<M: Serialize>(
        contract: &str,
        msg: &M,
        funds: Vec<Coin>,
        fee: StdFee,
    ) -> DashboardResult<Self> {
        Ok(Self {
            contract: contract.to_string(),
            msg: to_json_binary(msg)?,
            funds,
            fee,
        })
    }

    pub fn to_cosmos_msg(&self) -> CosmosMsg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: self.contract.clone(),
            msg: self.msg.clone(),
            funds: self.funds.clone(),
        })
    }
}

/// Market parameters and the contract's collateral denom.
pub fn fetch_market<Q: ChainQuerier>(
    querier: &Q,
    config: &DashboardConfig,
) -> DashboardResult<(MarketParameters, String)> {
    let contract = config.contract_address.as_str();

    let price: CollateralPriceResponse =
        querier.query_smart(contract, &DiraQueryMsg::QueryCollateralPrice {})?;
    let liquidation: LiquidationHealthResponse =
        querier.query_smart(contract, &DiraQueryMsg::QueryLiquidationHealth {})?;
    let mintable: MintableHealthResponse =
        querier.query_smart(contract, &DiraQueryMsg::QueryMintableHealth {})?;
    let denom: CollateralTokenDenomResponse =
        querier.query_smart(contract, &DiraQueryMsg::QueryCollateralTokenDenom {})?;

    let params = MarketParameters {
        collateral_price: price.collateral_price,
        liquidation_ratio: liquidation.liquidation_health,
        safe_ratio: mintable.mintable_health,
    };
    Ok((params, denom.collateral_token_denom))
}

/// Read the full snapshot for `address`. Any failing query fails the whole
/// refresh so the caller keeps its previous snapshot.
pub fn fetch_snapshot<Q: ChainQuerier>(
    querier: &Q,
    config: &DashboardConfig,
    address: &str,
) -> DashboardResult<MarketSnapshot> {
    let contract = config.contract_address.as_str();
    let (params, collateral_denom) = fetch_market(querier, config)?;

    let locked: LockedCollateralResponse = querier.query_smart(
        contract,
        &DiraQueryMsg::QueryLockedCollateral {
            wallet_address_to_query: address.to_string(),
        },
    )?;
    let minted: MintedDiraResponse = querier.query_smart(
        contract,
        &DiraQueryMsg::QueryMintedDira {
            wallet_address_to_query: address.to_string(),
        },
    )?;

    let balance = querier.query_balance(address, balance_denom(&collateral_denom, config))?;
    let wallet_balance = from_micro(balance.amount, config.token_decimals)?;

    Ok(MarketSnapshot {
        position: Position::new(locked.collateral_locked, minted.dira_minted),
        params,
        wallet_balance,
        collateral_denom,
    })
}

fn balance_denom<'a>(collateral_denom: &'a str, config: &'a DashboardConfig) -> &'a str {
    if collateral_denom.is_empty() {
        &config.collateral_denom
    } else {
        collateral_denom
    }
}

fn fee(config: &DashboardConfig, gas: u64) -> StdFee {
    StdFee {
        amount: vec![Coin {
            denom: config.fee_denom.clone(),
            amount: config.fees.fee_amount,
        }],
        gas,
    }
}

/// Messages for `action`, in execution order.
///
/// Returning Dira takes two: an allowance on the token contract for the Dira
/// contract, then the burn. They are separate transactions.
pub fn build_requests(
    action: &Action,
    config: &DashboardConfig,
    collateral_denom: &str,
) -> DashboardResult<Vec<TxRequest>> {
    let contract = config.contract_address.as_str();
    let execute_fee = || fee(config, config.fees.execute_gas);

    let requests = match *action {
        Action::LockCollateral(amount) => {
            let funds = vec![Coin {
                denom: balance_denom(collateral_denom, config).to_string(),
                amount: to_micro(amount, config.token_decimals)?,
            }];
            vec![TxRequest::new(
                contract,
                &DiraExecuteMsg::LockCollateral {},
                funds,
                execute_fee(),
            )?]
        }
        Action::UnlockCollateral(amount) => vec![TxRequest::new(
            contract,
            &DiraExecuteMsg::UnlockCollateral {
                collateral_amount_to_unlock: amount,
            },
            vec![],
            execute_fee(),
        )?],
        Action::MintDira(amount) => vec![TxRequest::new(
            contract,
            &DiraExecuteMsg::MintDira {
                dira_to_mint: amount,
            },
            vec![],
            execute_fee(),
        )?],
        Action::ReturnDira(amount) => return_dira_requests(amount, config)?,
    };
    Ok(requests)
}

fn return_dira_requests(
    amount: Decimal,
    config: &DashboardConfig,
) -> DashboardResult<Vec<TxRequest>> {
    let allowance = TxRequest::new(
        &config.cw20_contract_address,
        &Cw20ExecuteMsg::IncreaseAllowance {
            spender: config.contract_address.clone(),
            amount: to_micro(amount, config.token_decimals)?,
            expires: Some(Expiration::Never {}),
        },
        vec![],
        fee(config, config.fees.allowance_gas),
    )?;
    let burn = TxRequest::new(
        &config.contract_address,
        &DiraExecuteMsg::BurnDira {
            dira_to_burn: amount,
        },
        vec![],
        fee(config, config.fees.burn_gas),
    )?;
    Ok(vec![allowance, burn])
}
