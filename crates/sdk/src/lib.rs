//! Stablecoin protocol SDK.
//!
//! # Overview
//!
//! Typed access to the protocol contracts: collateralized positions,
//! governance, the stable swap module, staking and ERC-4626 vaults.
//!
//! Every state-changing call goes through one transaction lifecycle, see
//! [`tx`]: the call is built, its gas estimated and padded, the transaction
//! submitted and its receipt awaited. Progress is published to each
//! service's [`event::TransactionEmitter`] as `Pending`, then exactly one
//! of `Success` or `Error`.
//!
//! The SDK never signs or connects by itself. Embedding applications
//! implement [`client::ChainClient`], or wrap an alloy provider with a
//! wallet in [`client::ProviderClient`].
//!
//! ```ignore
//! let sdk = Sdk::new(ProviderClient::new(provider, sleep_fn(tokio::time::sleep)),
//!     chain_id, SdkConfig::load("sdk.toml")?, sleep_fn(tokio::time::sleep));
//! sdk.position.emitter().on(EventKind::PendingTransaction, |event| println!("{event}"));
//! let block = sdk.position.approve(user, collateral_token).await?;
//! ```
//!
//! # Legacy wallets
//!
//! Some wallets never resolve transaction submission. With
//! `legacy_wallet` enabled, operations are also confirmed by the called
//! contract's event stream, see [`tx::LegacyWalletShim`].
//!
//! # Features
//!
//! | Feature | Default | Description |
//! | --- | --- | --- |
//! | `display` | yes | Enables table [`std::fmt::Display`] of [`registry::ContractRegistry`]. |
//! | `testing` | yes | Enables [`testing`] module. |
//!
//! # Testing
//!
//! [`testing`] module provides [`testing::MockChain`], a scripted in-memory
//! chain client.

pub mod abi;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod event;
pub mod gas;
pub mod num;
pub mod registry;
pub mod service;
#[cfg(feature = "testing")]
pub mod testing;
pub mod tx;
pub mod types;

use std::sync::Arc;

use client::{ChainClient, Sleep};
use config::SdkConfig;
use contract::ContractInstanceCache;
use registry::ContractRegistry;
use service::{GovernanceService, PositionService, ServiceContext, StableSwapService, StakingService, VaultService};

/// All protocol services over one client, sharing contract registry and
/// binding cache.
pub struct Sdk<C> {
    pub position: PositionService<C>,
    pub governance: GovernanceService<C>,
    pub stable_swap: StableSwapService<C>,
    pub staking: StakingService<C>,
    pub vault: VaultService<C>,
    registry: Arc<ContractRegistry>,
    cache: Arc<ContractInstanceCache>,
}

impl<C: ChainClient> Sdk<C> {
    /// Builds the services with contract addresses taken from `config`.
    pub fn new(client: C, chain_id: u64, config: SdkConfig, sleep: Sleep) -> Self {
        let registry = ContractRegistry::from_config(&config);
        Self::with_registry(client, chain_id, registry, config, sleep)
    }

    pub fn with_registry(
        client: C,
        chain_id: u64,
        registry: ContractRegistry,
        config: SdkConfig,
        sleep: Sleep,
    ) -> Self {
        let client = Arc::new(client);
        let registry = Arc::new(registry);
        let cache = Arc::new(ContractInstanceCache::new());
        let config = Arc::new(config);
        let context = || {
            ServiceContext::new(
                client.clone(),
                chain_id,
                registry.clone(),
                cache.clone(),
                config.clone(),
                sleep.clone(),
            )
        };
        Self {
            position: PositionService::new(context()),
            governance: GovernanceService::new(context()),
            stable_swap: StableSwapService::new(context()),
            staking: StakingService::new(context()),
            vault: VaultService::new(context()),
            registry,
            cache,
        }
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ContractInstanceCache {
        &self.cache
    }
}
