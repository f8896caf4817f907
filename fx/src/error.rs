//! Conversion error types.

use spreadscope_common::AssetSymbol;
use thiserror::Error;

/// Why a conversion produced no amount.
///
/// Variants are listed in validation order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// Amount field is blank.
    #[error("Enter an amount")]
    EmptyInput,

    /// Amount does not parse to a finite number.
    #[error("Amount must be a number")]
    NotANumber,

    /// Amount is zero or negative.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// No usable rate for the selected pair.
    #[error("Rate for the selected pair is unavailable")]
    RateUnavailable {
        from: Option<AssetSymbol>,
        to: Option<AssetSymbol>,
    },
}

/// Broad class of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input.
    Input,
    /// Data for the pair is missing or unusable.
    DataUnavailable,
}

impl FxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FxError::EmptyInput | FxError::NotANumber | FxError::NonPositiveAmount => {
                ErrorKind::Input
            }
            FxError::RateUnavailable { .. } => ErrorKind::DataUnavailable,
        }
    }

    /// Get error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::EmptyInput => "EMPTY_INPUT",
            FxError::NotANumber => "NOT_A_NUMBER",
            FxError::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            FxError::RateUnavailable { .. } => "RATE_UNAVAILABLE",
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
