use crate::config::ChainInfo;
use crate::error::{DashboardError, DashboardResult};

/// Browser wallet extension (Keplr or compatible) as seen by the dashboard.
pub trait WalletProvider {
    /// Register the chain with the wallet. Re-suggesting a known chain is a no-op.
    fn suggest_chain(&mut self, chain: &ChainInfo) -> DashboardResult<()>;

    /// Ask the user to approve access for `chain_id`.
    fn enable(&mut self, chain_id: &str) -> DashboardResult<()>;

    /// Bech32 addresses of the offline signer for `chain_id`.
    fn accounts(&mut self, chain_id: &str) -> DashboardResult<Vec<String>>;
}

fn rejected(err: DashboardError) -> DashboardError {
    match err {
        DashboardError::ConnectionRejected { .. } => err,
        other => DashboardError::ConnectionRejected {
            reason: other.to_string(),
        },
    }
}

/// Suggest the chain, enable it and return the first account's address.
pub fn connect<W: WalletProvider + ?Sized>(
    provider: Option<&mut W>,
    chain: &ChainInfo,
) -> DashboardResult<String> {
    let provider = provider.ok_or(DashboardError::WalletMissing)?;

    provider.suggest_chain(chain).map_err(rejected)?;
    provider.enable(&chain.chain_id).map_err(rejected)?;

    let accounts = provider.accounts(&chain.chain_id).map_err(rejected)?;
    accounts
        .into_iter()
        .next()
        .ok_or(DashboardError::NoAccounts)
}

/// The connected account, if any.
///
/// Every establish or teardown starts a new epoch so results requested under
/// an earlier session can be told apart and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    epoch: u64,
    address: Option<String>,
}

impl Session {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn establish(&mut self, address: String) {
        self.epoch += 1;
        self.address = Some(address);
    }

    pub fn teardown(&mut self) {
        self.epoch += 1;
        self.address = None;
    }
}
