use alloy::primitives::{Address, B256, Bytes, TxHash};

/// Confirmation of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Unknown when the transaction was confirmed through a contract event
    /// that did not carry it.
    pub transaction_hash: Option<TxHash>,
    pub block_number: u64,
    /// Unknown when confirmed through a contract event.
    pub gas_used: Option<u64>,
    /// `false` if the transaction was mined but reverted.
    pub status: bool,
}

impl From<&ContractEvent> for Receipt {
    fn from(event: &ContractEvent) -> Self {
        Self {
            transaction_hash: event.transaction_hash,
            block_number: event.block_number,
            gas_used: None,
            status: true,
        }
    }
}

/// Log emitted by a contract, as delivered by the generic event stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractEvent {
    pub address: Address,
    pub block_number: u64,
    pub transaction_hash: Option<TxHash>,
    pub log_index: Option<u64>,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl ContractEvent {
    pub fn new(address: Address, block_number: u64) -> Self {
        Self {
            address,
            block_number,
            transaction_hash: None,
            log_index: None,
            topics: Vec::new(),
            data: Bytes::new(),
        }
    }
}
