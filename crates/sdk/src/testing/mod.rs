//! In-memory [`ChainClient`] for tests.
//!
//! [`MockChain`] answers reads from scripted return values, records every
//! estimate and submission, and lets tests fail or stall each stage of a
//! transaction.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard},
};

use alloy::{
    primitives::{Address, B256, Bytes, TxHash, keccak256},
    sol_types::SolCall,
};
use futures::{
    StreamExt,
    channel::mpsc::{self, UnboundedSender},
    future,
};

use crate::{
    client::{ChainClient, EventStream},
    error::ChainError,
    types::{CallOptions, ContractCall, ContractEvent, GasLimitedOptions, Receipt},
};

/// Raw gas estimate returned when none is scripted.
pub const DEFAULT_GAS_ESTIMATE: u64 = 100_000;

/// First block number receipts are mined in.
pub const FIRST_BLOCK: u64 = 100;

/// Transaction recorded by [`MockChain`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentTransaction {
    pub hash: TxHash,
    pub call: ContractCall,
    pub from: Address,
    pub gas: u64,
    pub value: Option<alloy::primitives::U256>,
}

#[derive(Default)]
struct State {
    reads: HashMap<(Address, [u8; 4]), VecDeque<Result<Bytes, ChainError>>>,
    estimates: VecDeque<Result<u64, ChainError>>,
    send_failures: VecDeque<ChainError>,
    receipt_failures: VecDeque<ChainError>,
    subscribe_failures: VecDeque<ChainError>,
    reverts: usize,
    hang_sends: bool,
    hang_receipts: bool,
    echo_events: bool,
    estimated: Vec<ContractCall>,
    sent: Vec<SentTransaction>,
    receipts_awaited: Vec<TxHash>,
    next_block: u64,
    subscribers: Vec<(Address, UnboundedSender<Result<ContractEvent, ChainError>>)>,
}

pub struct MockChain {
    state: Mutex<State>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self { state: Mutex::new(State { next_block: FIRST_BLOCK, ..Default::default() }) }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("mock chain state poisoned")
    }

    /// Queues the return value of a read. Queued values are consumed in
    /// order, the last one keeps being returned.
    pub fn push_read<C: SolCall>(&self, address: Address, ret: C::Return) -> &Self {
        let data = Bytes::from(C::abi_encode_returns(&ret));
        self.state().reads.entry((address, C::SELECTOR)).or_default().push_back(Ok(data));
        self
    }

    pub fn fail_read<C: SolCall>(&self, address: Address, err: ChainError) -> &Self {
        self.state().reads.entry((address, C::SELECTOR)).or_default().push_back(Err(err));
        self
    }

    /// Queues the result of the next gas estimate.
    pub fn push_estimate(&self, estimate: Result<u64, ChainError>) -> &Self {
        self.state().estimates.push_back(estimate);
        self
    }

    pub fn fail_next_send(&self, err: ChainError) -> &Self {
        self.state().send_failures.push_back(err);
        self
    }

    pub fn fail_next_receipt(&self, err: ChainError) -> &Self {
        self.state().receipt_failures.push_back(err);
        self
    }

    pub fn fail_next_subscription(&self, err: ChainError) -> &Self {
        self.state().subscribe_failures.push_back(err);
        self
    }

    /// Next mined receipt reports a reverted transaction.
    pub fn revert_next(&self) -> &Self {
        self.state().reverts += 1;
        self
    }

    /// Sends never resolve, like wallets that only confirm through events.
    pub fn hang_sends(&self) -> &Self {
        self.state().hang_sends = true;
        self
    }

    /// Receipts never arrive.
    pub fn hang_receipts(&self) -> &Self {
        self.state().hang_receipts = true;
        self
    }

    /// Every submitted transaction also emits an event of its target contract
    /// in the block its receipt is mined in.
    pub fn echo_events(&self) -> &Self {
        self.state().echo_events = true;
        self
    }

    /// Delivers an item to every event stream subscribed to the address.
    pub fn emit_event(&self, address: Address, item: Result<ContractEvent, ChainError>) {
        self.state().subscribers.retain(|(subscribed, tx)| {
            *subscribed != address || tx.unbounded_send(item.clone()).is_ok()
        });
    }

    pub fn subscriber_count(&self, address: Address) -> usize {
        self.state().subscribers.iter().filter(|(a, tx)| *a == address && !tx.is_closed()).count()
    }

    /// Calls gas was estimated for, in order.
    pub fn estimated(&self) -> Vec<ContractCall> {
        self.state().estimated.clone()
    }

    /// Submitted transactions, in order.
    pub fn sent(&self) -> Vec<SentTransaction> {
        self.state().sent.clone()
    }

    /// Submitted transactions calling `C` on the address.
    pub fn sent_calls<C: SolCall>(&self, address: Address) -> Vec<C> {
        self.state()
            .sent
            .iter()
            .filter(|tx| tx.call.to == address && tx.call.selector() == Some(C::SELECTOR))
            .filter_map(|tx| C::abi_decode(&tx.call.data).ok())
            .collect()
    }

    /// Hashes receipts were awaited for, in order.
    pub fn receipts_awaited(&self) -> Vec<TxHash> {
        self.state().receipts_awaited.clone()
    }
}

impl ChainClient for MockChain {
    async fn call(&self, call: &ContractCall, _from: Option<Address>) -> Result<Bytes, ChainError> {
        let mut state = self.state();
        let key = (call.to, call.selector().unwrap_or_default());
        let Some(queue) = state.reads.get_mut(&key) else {
            return Err(ChainError::new(3, format!("execution reverted: no mock for {}", call.method)));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Err(ChainError::message("empty mock read queue")))
        } else {
            queue.front().cloned().unwrap_or_else(|| Err(ChainError::message("empty mock read queue")))
        }
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        _options: &CallOptions,
    ) -> Result<u64, ChainError> {
        let mut state = self.state();
        state.estimated.push(call.clone());
        state.estimates.pop_front().unwrap_or(Ok(DEFAULT_GAS_ESTIMATE))
    }

    async fn send_transaction(
        &self,
        call: &ContractCall,
        options: &GasLimitedOptions,
    ) -> Result<TxHash, ChainError> {
        {
            let mut state = self.state();
            if let Some(err) = state.send_failures.pop_front() {
                return Err(err);
            }
            let hash = keccak256((state.sent.len() as u64).to_be_bytes());
            state.sent.push(SentTransaction {
                hash,
                call: call.clone(),
                from: options.from(),
                gas: options.gas(),
                value: options.value(),
            });
            if state.echo_events {
                let event = contract_event(call.to, state.next_block);
                state.subscribers.retain(|(subscribed, tx)| {
                    *subscribed != call.to || tx.unbounded_send(Ok(event.clone())).is_ok()
                });
            }
            if !state.hang_sends {
                return Ok(hash);
            }
        }
        future::pending().await
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ChainError> {
        let result = {
            let mut state = self.state();
            state.receipts_awaited.push(hash);
            if state.hang_receipts {
                None
            } else if let Some(err) = state.receipt_failures.pop_front() {
                Some(Err(err))
            } else {
                let block_number = state.next_block;
                state.next_block += 1;
                let status = if state.reverts > 0 {
                    state.reverts -= 1;
                    false
                } else {
                    true
                };
                Some(Ok(Receipt {
                    transaction_hash: Some(hash),
                    block_number,
                    gas_used: Some(DEFAULT_GAS_ESTIMATE),
                    status,
                }))
            }
        };
        match result {
            Some(result) => result,
            None => future::pending().await,
        }
    }

    async fn contract_events(&self, address: Address) -> Result<EventStream, ChainError> {
        let mut state = self.state();
        if let Some(err) = state.subscribe_failures.pop_front() {
            return Err(err);
        }
        let (tx, rx) = mpsc::unbounded();
        state.subscribers.push((address, tx));
        Ok(rx.boxed())
    }
}

/// Event as emitted by an arbitrary contract log in the given block.
pub fn contract_event(address: Address, block_number: u64) -> ContractEvent {
    ContractEvent {
        address,
        block_number,
        transaction_hash: Some(keccak256(block_number.to_be_bytes())),
        log_index: Some(0),
        topics: vec![B256::ZERO],
        data: Bytes::new(),
    }
}
