use alloy::{providers::PendingTransactionError, primitives::TxHash, transports::TransportError};
use thiserror::Error;

use crate::registry::ContractName;

/// Error reported by the chain client, preserved as the provider sent it so
/// callers can inspect provider-specific codes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}{}", .code.map(|c| format!(" (code {c})")).unwrap_or_default())]
pub struct ChainError {
    /// JSON-RPC or wallet error code, if the provider returned one.
    pub code: Option<i64>,
    pub message: String,
    /// Raw error data, e.g. revert data of a failed call.
    pub data: Option<String>,
}

impl ChainError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code: Some(code), message: message.into(), data: None }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self { code: None, message: message.into(), data: None }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

impl From<TransportError> for ChainError {
    fn from(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => Self {
                code: Some(payload.code),
                message: payload.message.to_string(),
                data: payload.data.as_ref().map(|d| d.get().to_string()),
            },
            None => Self::message(err.to_string()),
        }
    }
}

impl From<PendingTransactionError> for ChainError {
    fn from(err: PendingTransactionError) -> Self {
        match err {
            PendingTransactionError::TransportError(err) => err.into(),
            other => Self::message(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, Error)]
pub enum SdkError {
    #[error("contract {contract} is not deployed on chain {chain_id}")]
    Registry { chain_id: u64, contract: ContractName },

    #[error("call failed: {0}")]
    Call(ChainError),

    #[error("failed to decode return data: {0}")]
    Decode(String),

    #[error("gas estimation failed: {0}")]
    Estimation(ChainError),

    #[error("transaction submission failed: {0}")]
    Submission(ChainError),

    #[error("transaction receipt failed: {0}")]
    Receipt(ChainError),

    #[error("transaction reverted in block {block_number}")]
    Reverted { hash: Option<TxHash>, block_number: u64 },

    #[error("proxy wallet resolution failed: {0}")]
    ProxyResolution(ChainError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SdkError {
    /// Underlying provider error, if the failure came from the chain client.
    pub fn chain_error(&self) -> Option<&ChainError> {
        match self {
            SdkError::Call(e)
            | SdkError::Estimation(e)
            | SdkError::Submission(e)
            | SdkError::Receipt(e)
            | SdkError::ProxyResolution(e) => Some(e),
            _ => None,
        }
    }

    /// Provider error code, if any.
    pub fn code(&self) -> Option<i64> {
        self.chain_error().and_then(|e| e.code)
    }

    /// Re-labels a failure that happened while resolving a proxy wallet.
    pub(crate) fn into_proxy_resolution(self) -> Self {
        match self {
            SdkError::Call(e)
            | SdkError::Estimation(e)
            | SdkError::Submission(e)
            | SdkError::Receipt(e) => SdkError::ProxyResolution(e),
            SdkError::Decode(msg) => SdkError::ProxyResolution(ChainError::message(msg)),
            SdkError::Reverted { block_number, .. } => SdkError::ProxyResolution(
                ChainError::message(format!("proxy wallet build reverted in block {block_number}")),
            ),
            other => other,
        }
    }
}

impl From<alloy::sol_types::Error> for SdkError {
    fn from(err: alloy::sol_types::Error) -> Self {
        SdkError::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(err: toml::de::Error) -> Self {
        SdkError::Config(err.to_string())
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_error_display() {
        assert_eq!(ChainError::new(4001, "user rejected").to_string(), "user rejected (code 4001)");
        assert_eq!(ChainError::message("timeout").to_string(), "timeout");
    }

    #[test]
    fn test_code_is_reachable_through_variants() {
        let err = SdkError::Submission(ChainError::new(-32000, "nonce too low"));
        assert_eq!(err.code(), Some(-32000));
        assert_eq!(err.chain_error().unwrap().message, "nonce too low");
        assert_eq!(SdkError::InvalidArgument("x".into()).code(), None);
    }

    #[test]
    fn test_proxy_resolution_keeps_provider_error() {
        let err = SdkError::Estimation(ChainError::new(3, "execution reverted"))
            .into_proxy_resolution();
        assert!(matches!(err, SdkError::ProxyResolution(ref e) if e.code == Some(3)));
    }
}
