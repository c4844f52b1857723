use cosmwasm_std::{
    CheckedFromRatioError, DecimalRangeExceeded, DivideByZeroError, OverflowError, StdError,
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DiraError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    DivideByZero(#[from] DivideByZeroError),

    #[error("{0}")]
    CheckedFromRatio(#[from] CheckedFromRatioError),

    #[error("{0}")]
    DecimalRangeExceeded(#[from] DecimalRangeExceeded),

    #[error("Math overflow: {reason}")]
    MathOverflow { reason: String },

    #[error("Invalid amount: {input:?}")]
    InvalidAmount { input: String },

    #[error("Too many decimal places: at most {max} allowed")]
    TooManyDecimals { max: u32 },

    #[error("Amount {amount} exceeds the limit of {ceiling}")]
    ExceedsCeiling { amount: String, ceiling: String },

    #[error("Amount must be greater than 0")]
    ZeroAmount,

    #[error("Unsupported precision: {precision} decimal places")]
    UnsupportedPrecision { precision: u32 },
}
