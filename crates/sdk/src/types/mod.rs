mod call;
mod receipt;
mod transaction;

pub use call::{CallOptions, ContractCall, GasLimitedOptions};
pub use receipt::{ContractEvent, Receipt};
pub use transaction::{TransactionStatus, TransactionType};

/// Position ID within the position manager.
pub type PositionId = alloy::primitives::U256;

/// ID of a governance proposal.
pub type ProposalId = alloy::primitives::U256;

/// ID of a staking lock, 1-based per account.
pub type LockId = alloy::primitives::U256;

/// ID of a staking rewards stream.
pub type StreamId = alloy::primitives::U256;
