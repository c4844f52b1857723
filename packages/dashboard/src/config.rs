use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Uint128};

use crate::error::{DashboardError, DashboardResult};

/// Fractional digits accepted in amount inputs. Matches the token's smallest unit.
pub const DEFAULT_DECIMAL_PRECISION: u32 = 6;

/// Seconds between position refreshes while a wallet is connected.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Host whose requests are served from the dashboard route.
pub const DEFAULT_APP_HOST: &str = "app.dira.foundation";

/// Chain registration data suggested to the wallet provider.
#[cw_serde]
pub struct ChainInfo {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    /// BIP44 coin type
    pub coin_type: u32,
    /// Bech32 account prefix; the other prefixes are derived from it
    pub bech32_prefix: String,
    /// Display denom (e.g. "OM")
    pub coin_denom: String,
    /// On-chain denom (e.g. "uom")
    pub coin_minimal_denom: String,
    pub coin_decimals: u32,
    pub gas_price_low: Decimal,
    pub gas_price_average: Decimal,
    pub gas_price_high: Decimal,
}

impl ChainInfo {
    pub fn bech32_pub_prefix(&self) -> String {
        format!("{}pub", self.bech32_prefix)
    }

    pub fn bech32_valoper_prefix(&self) -> String {
        format!("{}valoper", self.bech32_prefix)
    }

    pub fn bech32_valcons_prefix(&self) -> String {
        format!("{}valcons", self.bech32_prefix)
    }
}

impl Default for ChainInfo {
    fn default() -> Self {
        Self {
            chain_id: "mantra-dukong-1".to_string(),
            chain_name: "MANTRA Dukong Testnet".to_string(),
            rpc: "https://rpc.dukong.mantrachain.io".to_string(),
            rest: "https://api.dukong.mantrachain.io".to_string(),
            coin_type: 118,
            bech32_prefix: "mantra".to_string(),
            coin_denom: "OM".to_string(),
            coin_minimal_denom: "uom".to_string(),
            coin_decimals: 6,
            gas_price_low: Decimal::permille(10),
            gas_price_average: Decimal::permille(25),
            gas_price_high: Decimal::permille(30),
        }
    }
}

/// Flat fees attached to each transaction, paid in the fee denom.
#[cw_serde]
pub struct FeeSchedule {
    pub fee_amount: Uint128,
    /// Gas limit for single-message contract calls
    pub execute_gas: u64,
    /// Gas limit for the CW20 allowance step of returning Dira
    pub allowance_gas: u64,
    /// Gas limit for the burn step of returning Dira
    pub burn_gas: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fee_amount: Uint128::new(5_000),
            execute_gas: 500_000,
            allowance_gas: 300_000,
            burn_gas: 600_000,
        }
    }
}

/// Everything the dashboard core needs from its environment.
/// Passed explicitly to the components that need it.
#[cw_serde]
pub struct DashboardConfig {
    /// Dira collateral contract
    pub contract_address: String,
    /// Dira CW20 token contract
    pub cw20_contract_address: String,
    /// Denom of transaction fees
    pub fee_denom: String,
    /// Collateral denom used until the contract reports its own
    pub collateral_denom: String,
    /// Decimal places of the collateral and Dira tokens
    pub token_decimals: u32,
    /// Fractional digits accepted in amount inputs
    pub decimal_precision: u32,
    pub poll_interval_secs: u64,
    pub app_host: String,
    pub chain: ChainInfo,
    pub fees: FeeSchedule,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let chain = ChainInfo::default();
        Self {
            contract_address: String::new(),
            cw20_contract_address: String::new(),
            fee_denom: chain.coin_minimal_denom.clone(),
            collateral_denom: chain.coin_minimal_denom.clone(),
            token_decimals: dira_types::TOKEN_DECIMALS,
            decimal_precision: DEFAULT_DECIMAL_PRECISION,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            app_host: DEFAULT_APP_HOST.to_string(),
            chain,
            fees: FeeSchedule::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: String) -> DashboardResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| DashboardError::Config {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

impl DashboardConfig {
    /// Load from `DIRA_*` environment variables.
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` as the variable source.
    /// Contract addresses are required; everything else falls back to defaults.
    pub fn from_lookup<F>(lookup: F) -> DashboardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| DashboardError::Config {
                key: key.to_string(),
                reason: "not set".to_string(),
            })
        };

        let mut config = DashboardConfig {
            contract_address: required("DIRA_CONTRACT_ADDRESS")?,
            cw20_contract_address: required("DIRA_CW20_CONTRACT_ADDRESS")?,
            ..Default::default()
        };

        if let Some(chain_id) = lookup("DIRA_CHAIN_ID") {
            config.chain.chain_id = chain_id;
        }
        if let Some(name) = lookup("DIRA_CHAIN_NAME") {
            config.chain.chain_name = name;
        }
        if let Some(rpc) = lookup("DIRA_RPC_ENDPOINT") {
            config.chain.rpc = rpc;
        }
        if let Some(prefix) = lookup("DIRA_BECH32_HRP") {
            config.chain.bech32_prefix = prefix;
        }
        if let Some(denom) = lookup("DIRA_DENOM") {
            config.chain.coin_minimal_denom = denom.clone();
            config.fee_denom = denom.clone();
            config.collateral_denom = denom;
        }
        if let Some(denom) = lookup("DIRA_COLLATERAL_DENOM") {
            config.collateral_denom = denom;
        }
        if let Some(raw) = lookup("DIRA_DECIMAL_PRECISION") {
            config.decimal_precision = parse_var("DIRA_DECIMAL_PRECISION", raw)?;
        }
        if let Some(raw) = lookup("DIRA_POLL_INTERVAL_SECS") {
            config.poll_interval_secs = parse_var("DIRA_POLL_INTERVAL_SECS", raw)?;
        }
        if let Some(host) = lookup("DIRA_APP_HOST") {
            config.app_host = host;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        let invalid = |key: &str, reason: &str| {
            Err(DashboardError::Config {
                key: key.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.contract_address.is_empty() {
            return invalid("contract_address", "must not be empty");
        }
        if self.cw20_contract_address.is_empty() {
            return invalid("cw20_contract_address", "must not be empty");
        }
        if self.fee_denom.is_empty() {
            return invalid("fee_denom", "must not be empty");
        }
        if self.collateral_denom.is_empty() {
            return invalid("collateral_denom", "must not be empty");
        }
        if self.token_decimals > Decimal::DECIMAL_PLACES {
            return invalid("token_decimals", "exceeds 18 decimal places");
        }
        if self.decimal_precision > self.token_decimals {
            return invalid(
                "decimal_precision",
                "must not exceed the token's decimal places",
            );
        }
        if self.poll_interval_secs == 0 {
            return invalid("poll_interval_secs", "must be greater than zero");
        }
        Ok(())
    }
}
