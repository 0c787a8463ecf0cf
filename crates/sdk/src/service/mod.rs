//! Protocol services.
//!
//! Each service owns a [`ServiceContext`] with its own
//! [`TransactionEmitter`]; the contract registry and binding cache are
//! shared by all services of one [`crate::Sdk`].

mod governance;
mod position;
mod stable_swap;
mod staking;
mod vault;

use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use alloy::{
    primitives::{Address, U256},
    sol_types::SolCall,
};
pub use governance::{GovernanceService, ProposalActions, ProposalState, VoteSupport};
pub use position::PositionService;
pub use stable_swap::{StableSwapService, SwapSpender};
pub use staking::StakingService;
pub use vault::VaultService;

use crate::{
    abi::IERC20,
    client::{ChainClient, Sleep},
    config::SdkConfig,
    contract::{BindingKind, ContractBinding, ContractInstanceCache},
    error::SdkError,
    event::TransactionEmitter,
    registry::{ContractName, ContractRegistry},
    tx::{LegacyWalletShim, ProxyResolver, TransactionOrchestrator, TxLabel},
};

/// Execution context of one service instance.
///
/// Mutators only affect operations started afterwards: each operation
/// works on an [`Env`] snapshot taken when it starts.
pub struct ServiceContext<C> {
    client: RwLock<Arc<C>>,
    chain_id: AtomicU64,
    legacy_wallet: AtomicBool,
    registry: Arc<ContractRegistry>,
    cache: Arc<ContractInstanceCache>,
    config: Arc<SdkConfig>,
    emitter: TransactionEmitter,
    sleep: Sleep,
}

impl<C: ChainClient> ServiceContext<C> {
    pub fn new(
        client: Arc<C>,
        chain_id: u64,
        registry: Arc<ContractRegistry>,
        cache: Arc<ContractInstanceCache>,
        config: Arc<SdkConfig>,
        sleep: Sleep,
    ) -> Self {
        Self {
            client: RwLock::new(client),
            chain_id: AtomicU64::new(chain_id),
            legacy_wallet: AtomicBool::new(config.legacy_wallet),
            registry,
            cache,
            config,
            emitter: TransactionEmitter::new(),
            sleep,
        }
    }

    pub fn emitter(&self) -> &TransactionEmitter {
        &self.emitter
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id.load(Ordering::Acquire)
    }

    pub fn cache(&self) -> &ContractInstanceCache {
        &self.cache
    }

    pub fn set_provider(&self, client: C) {
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(client);
        self.cache.clear();
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.chain_id.store(chain_id, Ordering::Release);
        self.cache.clear();
    }

    /// Switches event-based confirmation for wallets that never resolve
    /// transaction submission.
    pub fn set_legacy_wallet(&self, enabled: bool) {
        self.legacy_wallet.store(enabled, Ordering::Release);
    }

    /// Snapshot of the current execution context.
    pub fn env(&self) -> Env<C> {
        let client = self.client.read().unwrap_or_else(PoisonError::into_inner).clone();
        let mut orchestrator = TransactionOrchestrator::new(client, self.emitter.clone());
        if self.legacy_wallet.load(Ordering::Acquire) {
            orchestrator = orchestrator
                .with_legacy_wallet(LegacyWalletShim::from_config(&self.config, self.sleep.clone()));
        }
        Env {
            chain_id: self.chain_id(),
            registry: self.registry.clone(),
            cache: self.cache.clone(),
            orchestrator,
        }
    }
}

/// Execution context of a single operation.
pub struct Env<C> {
    chain_id: u64,
    registry: Arc<ContractRegistry>,
    cache: Arc<ContractInstanceCache>,
    orchestrator: TransactionOrchestrator<C>,
}

impl<C: ChainClient> Env<C> {
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn client(&self) -> &C {
        self.orchestrator.client()
    }

    pub fn address(&self, name: ContractName) -> Result<Address, SdkError> {
        self.registry.resolve(self.chain_id, name)
    }

    /// Binding of a registry contract.
    pub fn binding(&self, kind: BindingKind, name: ContractName) -> Result<Arc<ContractBinding>, SdkError> {
        Ok(self.cache.get(kind, self.address(name)?, name.interface()))
    }

    /// Binding of a contract outside the registry (tokens, vaults, proxies).
    pub fn contract(&self, kind: BindingKind, address: Address, interface: &'static str) -> Arc<ContractBinding> {
        self.cache.get(kind, address, interface)
    }

    pub async fn read<Call>(&self, name: ContractName, call: Call) -> Result<Call::Return, SdkError>
    where
        Call: SolCall + Send,
    {
        self.binding(BindingKind::ReadOnly, name)?.read(self.client(), call).await
    }

    pub async fn execute<F>(&self, label: TxLabel, build: F) -> Result<u64, SdkError>
    where
        F: Future<Output = Result<crate::tx::Operation, SdkError>>,
    {
        self.orchestrator.execute(label, build).await
    }

    pub async fn proxy_of(&self, user: Address) -> Result<Option<Address>, SdkError> {
        let registry = self.binding(BindingKind::ReadOnly, ContractName::ProxyWalletRegistry)?;
        ProxyResolver::new(self.client(), self.orchestrator.estimator(), &registry).proxy_of(user).await
    }

    pub async fn ensure_proxy(&self, user: Address) -> Result<Address, SdkError> {
        let registry = self.binding(BindingKind::Signer, ContractName::ProxyWalletRegistry)?;
        ProxyResolver::new(self.client(), self.orchestrator.estimator(), &registry)
            .with_legacy_wallet(self.orchestrator.legacy_wallet())
            .ensure_proxy(user)
            .await
    }

    pub async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, SdkError> {
        self.contract(BindingKind::ReadOnly, token, "IERC20")
            .read(self.client(), IERC20::allowanceCall { owner, spender })
            .await
    }

    pub async fn token_balance(&self, token: Address, account: Address) -> Result<U256, SdkError> {
        self.contract(BindingKind::ReadOnly, token, "IERC20")
            .read(self.client(), IERC20::balanceOfCall { account })
            .await
    }
}

/// Surface shared by all services.
pub trait Service<C: ChainClient> {
    fn context(&self) -> &ServiceContext<C>;

    /// Lifecycle events of this service's operations.
    fn emitter(&self) -> &TransactionEmitter {
        self.context().emitter()
    }

    /// Swaps the chain client for subsequent calls; in-flight operations
    /// keep the client they started with.
    fn set_provider(&self, client: C) {
        self.context().set_provider(client)
    }

    /// Switches the chain for subsequent calls.
    fn set_chain_id(&self, chain_id: u64) {
        self.context().set_chain_id(chain_id)
    }

    fn set_legacy_wallet(&self, enabled: bool) {
        self.context().set_legacy_wallet(enabled)
    }
}

macro_rules! impl_service {
    ($($service:ident),*) => {
        $(
            impl<C: ChainClient> $service<C> {
                pub fn new(ctx: ServiceContext<C>) -> Self {
                    Self { ctx }
                }
            }

            impl<C: ChainClient> Service<C> for $service<C> {
                fn context(&self) -> &ServiceContext<C> {
                    &self.ctx
                }
            }
        )*
    };
}

impl_service!(PositionService, GovernanceService, StableSwapService, StakingService, VaultService);
