use std::{collections::HashMap, fmt::Display};

use alloy::primitives::Address;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{config::SdkConfig, error::SdkError};

/// Protocol contracts with a fixed per-chain deployment address.
///
/// Tokens and vaults are addressed directly by callers and are not part of
/// the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractName {
    ProxyWalletRegistry,
    ProxyActions,
    PositionManager,
    StabilityFeeCollector,
    CollateralTokenAdapter,
    StablecoinAdapter,
    Stablecoin,
    Governor,
    StableSwapModule,
    StableSwapModuleWrapper,
    Staking,
    StakingToken,
}

impl ContractName {
    /// Name of the Solidity interface the contract is called through.
    pub fn interface(&self) -> &'static str {
        match self {
            ContractName::ProxyWalletRegistry => "IProxyWalletRegistry",
            ContractName::ProxyActions => "IProxyActions",
            ContractName::PositionManager => "IPositionManager",
            ContractName::StabilityFeeCollector => "IStabilityFeeCollector",
            ContractName::CollateralTokenAdapter => "ICollateralTokenAdapter",
            ContractName::StablecoinAdapter => "IStablecoinAdapter",
            ContractName::Stablecoin | ContractName::StakingToken => "IERC20",
            ContractName::Governor => "IGovernor",
            ContractName::StableSwapModule => "IStableSwapModule",
            ContractName::StableSwapModuleWrapper => "IStableSwapModuleWrapper",
            ContractName::Staking => "IStaking",
        }
    }
}

impl Display for ContractName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Static lookup of contract deployments: `(chain id, contract) -> address`.
///
/// Pure table, never performs I/O after construction.
#[derive(Clone, Debug, Default)]
pub struct ContractRegistry {
    chains: HashMap<u64, HashMap<ContractName, Address>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SdkConfig) -> Self {
        let mut registry = Self::new();
        for chain in &config.chains {
            for (name, address) in &chain.contracts {
                registry = registry.with_contract(chain.chain_id, *name, *address);
            }
        }
        registry
    }

    pub fn with_contract(mut self, chain_id: u64, name: ContractName, address: Address) -> Self {
        self.chains.entry(chain_id).or_default().insert(name, address);
        self
    }

    pub fn resolve(&self, chain_id: u64, name: ContractName) -> Result<Address, SdkError> {
        self.chains
            .get(&chain_id)
            .and_then(|contracts| contracts.get(&name))
            .copied()
            .ok_or(SdkError::Registry { chain_id, contract: name })
    }

    /// Chain IDs with at least one known deployment, sorted.
    pub fn chain_ids(&self) -> Vec<u64> {
        self.chains.keys().copied().sorted().collect()
    }

    /// Deployments known for the chain, sorted by contract name.
    pub fn contracts(&self, chain_id: u64) -> Vec<(ContractName, Address)> {
        self.chains
            .get(&chain_id)
            .map(|contracts| {
                contracts.iter().map(|(n, a)| (*n, *a)).sorted_by_key(|(n, _)| *n).collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(feature = "display")]
mod display {
    use tabled::{Table, Tabled, settings::Style};

    use super::*;

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Chain")]
        chain_id: u64,
        #[tabled(rename = "Contract")]
        name: ContractName,
        #[tabled(rename = "Address")]
        address: Address,
    }

    impl Display for ContractRegistry {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let rows = self.chain_ids().into_iter().flat_map(|chain_id| {
                self.contracts(chain_id)
                    .into_iter()
                    .map(move |(name, address)| Row { chain_id, name, address })
            });
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            write!(f, "{}", table)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn test_resolve() {
        let registry = ContractRegistry::new()
            .with_contract(51, ContractName::Staking, address!("0x1111111111111111111111111111111111111111"))
            .with_contract(50, ContractName::Staking, address!("0x2222222222222222222222222222222222222222"));

        assert_eq!(
            registry.resolve(51, ContractName::Staking).unwrap(),
            address!("0x1111111111111111111111111111111111111111")
        );
        assert!(matches!(
            registry.resolve(51, ContractName::Governor),
            Err(SdkError::Registry { chain_id: 51, contract: ContractName::Governor })
        ));
        assert!(registry.resolve(1, ContractName::Staking).is_err());
        assert_eq!(registry.chain_ids(), vec![50, 51]);
    }
}
