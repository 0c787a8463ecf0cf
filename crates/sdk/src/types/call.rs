use std::num::NonZeroU64;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

/// Encoded contract call: target address plus calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub data: Bytes,
    /// Solidity signature of the called method, for diagnostics.
    pub method: &'static str,
}

impl ContractCall {
    pub fn new<C: SolCall>(to: Address, call: &C) -> Self {
        Self { to, data: call.abi_encode().into(), method: C::SIGNATURE }
    }

    /// 4-byte selector of the called method.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|s| s.try_into().ok())
    }
}

/// Base options of a state-changing call, before gas estimation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallOptions {
    pub from: Address,
    /// Native value attached to payable calls.
    pub value: Option<U256>,
}

impl CallOptions {
    pub fn new(from: Address) -> Self {
        Self { from, value: None }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Finalizes the options with the estimated gas limit.
    pub(crate) fn with_gas(self, gas: NonZeroU64) -> GasLimitedOptions {
        GasLimitedOptions { from: self.from, value: self.value, gas }
    }
}

/// Options a transaction is submitted with.
///
/// Only produced by [`crate::gas::GasEstimator`], so a transaction is never
/// submitted without an estimated, non-zero gas limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasLimitedOptions {
    from: Address,
    value: Option<U256>,
    gas: NonZeroU64,
}

impl GasLimitedOptions {
    pub fn from(&self) -> Address {
        self.from
    }

    pub fn value(&self) -> Option<U256> {
        self.value
    }

    pub fn gas(&self) -> u64 {
        self.gas.get()
    }
}
