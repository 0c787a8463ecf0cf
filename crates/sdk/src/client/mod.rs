//! Chain client seam: everything the SDK needs from a node or wallet.

mod provider;

use std::{sync::Arc, time::Duration};

use alloy::primitives::{Address, Bytes, TxHash};
use futures::{FutureExt, future::BoxFuture, stream::BoxStream};
pub use provider::ProviderClient;

use crate::{
    error::ChainError,
    types::{CallOptions, ContractCall, ContractEvent, GasLimitedOptions, Receipt},
};

/// Stream of events emitted by one contract.
pub type EventStream = BoxStream<'static, Result<ContractEvent, ChainError>>;

/// Runtime-provided sleep, e.g. `tokio::time::sleep`.
pub type Sleep = Arc<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

/// Wraps a runtime sleep function into [`Sleep`].
pub fn sleep_fn<S, SFut>(sleep: S) -> Sleep
where
    S: Fn(Duration) -> SFut + Send + Sync + 'static,
    SFut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |duration| sleep(duration).boxed())
}

/// Connection, signing and transport, provided by the embedding application.
///
/// Implementations must report a reverting gas estimate as an error, and
/// signal the transaction hash (from [`ChainClient::send_transaction`])
/// before the receipt (from [`ChainClient::wait_for_receipt`]).
pub trait ChainClient: Send + Sync + 'static {
    /// Executes a read-only call and returns raw return data.
    fn call(
        &self,
        call: &ContractCall,
        from: Option<Address>,
    ) -> impl Future<Output = Result<Bytes, ChainError>> + Send;

    /// Returns the raw gas estimate of a call; fails if the call would revert.
    fn estimate_gas(
        &self,
        call: &ContractCall,
        options: &CallOptions,
    ) -> impl Future<Output = Result<u64, ChainError>> + Send;

    /// Submits a transaction and resolves once its hash is known.
    fn send_transaction(
        &self,
        call: &ContractCall,
        options: &GasLimitedOptions,
    ) -> impl Future<Output = Result<TxHash, ChainError>> + Send;

    /// Resolves once the transaction is mined.
    fn wait_for_receipt(&self, hash: TxHash)
    -> impl Future<Output = Result<Receipt, ChainError>> + Send;

    /// Subscribes to all events the contract emits from now on.
    ///
    /// Resolves once the subscription is in place, so that events of a
    /// transaction sent afterwards are never missed.
    fn contract_events(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<EventStream, ChainError>> + Send;
}

impl<C: ChainClient> ChainClient for Arc<C> {
    fn call(
        &self,
        call: &ContractCall,
        from: Option<Address>,
    ) -> impl Future<Output = Result<Bytes, ChainError>> + Send {
        (**self).call(call, from)
    }

    fn estimate_gas(
        &self,
        call: &ContractCall,
        options: &CallOptions,
    ) -> impl Future<Output = Result<u64, ChainError>> + Send {
        (**self).estimate_gas(call, options)
    }

    fn send_transaction(
        &self,
        call: &ContractCall,
        options: &GasLimitedOptions,
    ) -> impl Future<Output = Result<TxHash, ChainError>> + Send {
        (**self).send_transaction(call, options)
    }

    fn wait_for_receipt(&self, hash: TxHash) -> impl Future<Output = Result<Receipt, ChainError>> + Send {
        (**self).wait_for_receipt(hash)
    }

    fn contract_events(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<EventStream, ChainError>> + Send {
        (**self).contract_events(address)
    }
}
