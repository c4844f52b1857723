use cosmwasm_std::{CheckedFromRatioError, OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DashboardError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Types(#[from] dira_types::DiraError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    CheckedFromRatio(#[from] CheckedFromRatioError),

    #[error("Wallet extension is required. Please install Keplr.")]
    WalletMissing,

    #[error("Failed to connect wallet: {reason}")]
    ConnectionRejected { reason: String },

    #[error("No accounts found in wallet")]
    NoAccounts,

    #[error("A transaction is already pending")]
    TransactionPending,

    #[error("Query failed: {reason}")]
    Query { reason: String },

    #[error("{reason}")]
    Execution { reason: String },

    #[error("Invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },
}

pub type DashboardResult<T> = Result<T, DashboardError>;
