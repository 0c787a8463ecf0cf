use std::sync::Arc;

use alloy::{primitives::Address, sol_types::SolCall};
use dashmap::DashMap;

use crate::{client::ChainClient, error::SdkError, types::ContractCall};

/// Whether a binding is used for reads only or as a transaction target.
///
/// Only a cache key: both kinds encode and read the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    ReadOnly,
    Signer,
}

/// Handle bound to one contract address and one interface.
///
/// Holds no client. Every call takes the client of the operation that makes
/// it, so a binding can be shared across provider switches while in-flight
/// operations keep the client they started with.
#[derive(Debug, PartialEq, Eq)]
pub struct ContractBinding {
    kind: BindingKind,
    address: Address,
    interface: &'static str,
}

impl ContractBinding {
    pub fn new(kind: BindingKind, address: Address, interface: &'static str) -> Self {
        Self { kind, address, interface }
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Name of the Solidity interface the contract is called through.
    pub fn interface(&self) -> &'static str {
        self.interface
    }

    /// Encodes a call to this contract.
    pub fn prepare<C: SolCall>(&self, call: &C) -> ContractCall {
        ContractCall::new(self.address, call)
    }

    /// Executes a read-only call and decodes its return value.
    pub async fn read<C, Cl>(&self, client: &Cl, call: C) -> Result<C::Return, SdkError>
    where
        C: SolCall + Send,
        Cl: ChainClient,
    {
        let data = client.call(&self.prepare(&call), None).await.map_err(SdkError::Call)?;
        Ok(C::abi_decode_returns(&data)?)
    }
}

/// Memoized contract bindings keyed by `(kind, address)`.
///
/// Shared by all services constructed over the same [`crate::Sdk`];
/// concurrent first use of a key constructs exactly one binding.
#[derive(Debug, Default)]
pub struct ContractInstanceCache {
    bindings: DashMap<(BindingKind, Address), Arc<ContractBinding>>,
}

impl ContractInstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached binding for the key, constructing it with `factory`
    /// on first use.
    pub fn get_or_create<F>(&self, kind: BindingKind, address: Address, factory: F) -> Arc<ContractBinding>
    where
        F: FnOnce() -> ContractBinding,
    {
        self.bindings
            .entry((kind, address))
            .or_insert_with(|| {
                tracing::trace!(?kind, %address, "creating contract binding");
                Arc::new(factory())
            })
            .clone()
    }

    pub fn get(&self, kind: BindingKind, address: Address, interface: &'static str) -> Arc<ContractBinding> {
        self.get_or_create(kind, address, || ContractBinding::new(kind, address, interface))
    }

    /// Evicts all bindings, e.g. after switching networks. Bindings held by
    /// in-flight operations stay valid.
    pub fn clear(&self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const TOKEN: Address = address!("0x3333333333333333333333333333333333333333");

    #[test]
    fn test_same_key_returns_same_instance() {
        let cache = ContractInstanceCache::new();
        let a = cache.get(BindingKind::Signer, TOKEN, "IERC20");
        let b = cache.get(BindingKind::Signer, TOKEN, "IERC20");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_kind_is_part_of_key() {
        let cache = ContractInstanceCache::new();
        let signer = cache.get(BindingKind::Signer, TOKEN, "IERC20");
        let read_only = cache.get(BindingKind::ReadOnly, TOKEN, "IERC20");
        assert!(!Arc::ptr_eq(&signer, &read_only));
        assert_eq!(read_only.kind(), BindingKind::ReadOnly);
    }

    #[test]
    fn test_factory_runs_once() {
        let cache = ContractInstanceCache::new();
        let mut calls = 0;
        cache.get_or_create(BindingKind::ReadOnly, TOKEN, || {
            calls += 1;
            ContractBinding::new(BindingKind::ReadOnly, TOKEN, "IERC20")
        });
        cache.get_or_create(BindingKind::ReadOnly, TOKEN, || {
            calls += 1;
            ContractBinding::new(BindingKind::ReadOnly, TOKEN, "IERC20")
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_clear_forces_new_instance() {
        let cache = ContractInstanceCache::new();
        let before = cache.get(BindingKind::Signer, TOKEN, "IERC20");
        cache.clear();
        assert!(cache.is_empty());
        let after = cache.get(BindingKind::Signer, TOKEN, "IERC20");
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
    }

    #[test]
    fn test_concurrent_first_use() {
        let cache = Arc::new(ContractInstanceCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.get(BindingKind::Signer, TOKEN, "IERC20"))
            })
            .collect();
        let bindings: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(bindings.iter().all(|b| Arc::ptr_eq(b, &bindings[0])));
    }
}
