use std::{collections::HashMap, path::Path, time::Duration};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{error::SdkError, registry::ContractName};

/// Default quiet period of the legacy wallet resolution shim.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Wallet error codes the legacy wallet resolution shim treats as noise:
/// EIP-1193 "unauthorized" and "disconnected", plus the generic internal
/// JSON-RPC error some wallets attach to event subscriptions.
pub const DEFAULT_SKIP_ERROR_CODES: [i64; 3] = [4100, 4900, -32603];

/// SDK configuration, usually loaded from a TOML file:
///
/// ```toml
/// debounce_ms = 500
/// skip_error_codes = [4100, 4900, -32603]
/// legacy_wallet = false
///
/// [[chains]]
/// chain_id = 51
///
/// [chains.contracts]
/// proxy_wallet_registry = "0x..."
/// stablecoin = "0x..."
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Quiet period of the legacy wallet resolution shim, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Error codes ignored by the legacy wallet resolution shim.
    #[serde(default = "default_skip_error_codes")]
    pub skip_error_codes: Vec<i64>,

    /// Whether transactions are submitted through a wallet that never
    /// resolves the submission and needs event-based resolution.
    #[serde(default)]
    pub legacy_wallet: bool,

    #[serde(default)]
    pub chains: Vec<ChainConfig>,
}

/// Contract deployments of one chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    #[serde(default)]
    pub contracts: HashMap<ContractName, Address>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_skip_error_codes() -> Vec<i64> {
    DEFAULT_SKIP_ERROR_CODES.to_vec()
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            skip_error_codes: default_skip_error_codes(),
            legacy_wallet: false,
            chains: Vec::new(),
        }
    }
}

impl SdkConfig {
    pub fn from_toml(s: &str) -> Result<Self, SdkError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn validate(&self) -> Result<(), SdkError> {
        if self.debounce_ms == 0 {
            return Err(SdkError::Config("debounce_ms must be positive".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.chains.iter().find(|c| !seen.insert(c.chain_id)) {
            return Err(SdkError::Config(format!("chain {} is configured twice", dup.chain_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = SdkConfig::from_toml("").unwrap();
        assert_eq!(config, SdkConfig::default());
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert!(!config.legacy_wallet);
    }

    #[test]
    fn test_parse_chains() {
        let config = SdkConfig::from_toml(
            r#"
            debounce_ms = 250
            skip_error_codes = [4001]
            legacy_wallet = true

            [[chains]]
            chain_id = 51

            [chains.contracts]
            proxy_wallet_registry = "0x1111111111111111111111111111111111111111"
            stable_swap_module = "0x2222222222222222222222222222222222222222"
            "#,
        )
        .unwrap();

        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.skip_error_codes, vec![4001]);
        assert!(config.legacy_wallet);
        assert_eq!(config.chains.len(), 1);
        assert_eq!(
            config.chains[0].contracts.get(&ContractName::StableSwapModule),
            Some(&address!("0x2222222222222222222222222222222222222222"))
        );
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(SdkConfig::from_toml("debounce_ms = 0"), Err(SdkError::Config(_))));
        assert!(matches!(
            SdkConfig::from_toml("[[chains]]\nchain_id = 1\n[[chains]]\nchain_id = 1\n"),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(SdkConfig::from_toml("debounce_ms = \"x\""), Err(SdkError::Config(_))));
    }
}
