use alloy::{
    eips::BlockId,
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::{Filter, TransactionRequest},
};
use futures::{StreamExt, stream};

use super::{ChainClient, EventStream, Sleep};
use crate::{
    error::ChainError,
    types::{CallOptions, ContractCall, ContractEvent, GasLimitedOptions, Receipt},
};

/// [`ChainClient`] backed by an alloy [`Provider`].
///
/// Transactions are sent with `eth_sendTransaction` semantics unless the
/// provider is set up with a wallet filler, in which case they are signed
/// locally.
///
/// It is recommended to setup provider with
/// [`alloy::transports::layers::RetryBackoffLayer`].
#[derive(Clone)]
pub struct ProviderClient<P> {
    provider: P,
    sleep: Sleep,
}

impl<P> ProviderClient<P> {
    pub fn new(provider: P, sleep: Sleep) -> Self {
        Self { provider, sleep }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

fn request(call: &ContractCall) -> TransactionRequest {
    TransactionRequest::default().with_to(call.to).with_input(call.data.clone())
}

impl<P> ChainClient for ProviderClient<P>
where
    P: Provider + Clone + 'static,
{
    async fn call(&self, call: &ContractCall, from: Option<Address>) -> Result<Bytes, ChainError> {
        let mut tx = request(call);
        if let Some(from) = from {
            tx = tx.with_from(from);
        }
        Ok(self.provider.call(tx).await?)
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        options: &CallOptions,
    ) -> Result<u64, ChainError> {
        let mut tx = request(call).with_from(options.from);
        if let Some(value) = options.value {
            tx = tx.with_value(value);
        }
        Ok(self.provider.estimate_gas(tx).await?)
    }

    async fn send_transaction(
        &self,
        call: &ContractCall,
        options: &GasLimitedOptions,
    ) -> Result<TxHash, ChainError> {
        let mut tx = request(call).with_from(options.from()).with_gas_limit(options.gas());
        if let Some(value) = options.value() {
            tx = tx.with_value(value);
        }
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ChainError> {
        let receipt =
            PendingTransactionBuilder::new(self.provider.root().clone(), hash).get_receipt().await?;
        Ok(Receipt {
            transaction_hash: Some(receipt.transaction_hash()),
            block_number: receipt.block_number().unwrap_or_default(),
            gas_used: Some(receipt.gas_used()),
            status: receipt.status(),
        })
    }

    /// Polls logs block by block, starting from the block after the latest
    /// one, to produce strictly continuous event sequence.
    ///
    /// The starting block is fixed before this resolves.
    async fn contract_events(&self, address: Address) -> Result<EventStream, ChainError> {
        let start = self.provider.get_block_number().await? + 1;
        Ok(stream::unfold(
            (self.provider.clone(), self.sleep.clone(), start),
            move |(provider, sleep, block_num)| async move {
                let filter = Filter::new().address(address).from_block(block_num).to_block(block_num);
                loop {
                    // Some nodes answer with empty logs instead of an error for
                    // blocks that do not exist yet, so check the block explicitly
                    let result = futures::try_join!(
                        provider.get_block(BlockId::number(block_num)).into_future(),
                        provider.get_logs(&filter)
                    );
                    match result {
                        Ok((Some(_), logs)) => {
                            let events = logs
                                .iter()
                                .map(|log| {
                                    Ok(ContractEvent {
                                        address: log.inner.address,
                                        block_number: log.block_number.unwrap_or(block_num),
                                        transaction_hash: log.transaction_hash,
                                        log_index: log.log_index,
                                        topics: log.inner.data.topics().to_vec(),
                                        data: log.inner.data.data.clone(),
                                    })
                                })
                                .collect::<Vec<_>>();
                            return Some((events, (provider, sleep, block_num + 1)));
                        },
                        Ok((None, _)) => {
                            sleep(provider.client().poll_interval()).await;
                        },
                        Err(err) => {
                            return Some((vec![Err(err.into())], (provider, sleep, block_num)));
                        },
                    }
                }
            },
        )
        .flat_map(stream::iter)
        .boxed())
    }
}
