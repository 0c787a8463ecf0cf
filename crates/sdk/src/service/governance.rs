use alloy::primitives::{Address, Bytes, U256, keccak256};

use super::ServiceContext;
use crate::{
    abi::IGovernor,
    client::ChainClient,
    contract::BindingKind,
    error::SdkError,
    registry::ContractName,
    tx::{Operation, TxLabel},
    types::{CallOptions, ProposalId, TransactionType},
};

/// Vote options of the governor's simple counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
#[repr(u8)]
pub enum VoteSupport {
    Against = 0,
    For = 1,
    Abstain = 2,
}

/// Proposal lifecycle states as reported by the governor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum ProposalState {
    Pending,
    Active,
    Canceled,
    Defeated,
    Succeeded,
    Queued,
    Expired,
    Executed,
}

impl TryFrom<u8> for ProposalState {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Pending,
            1 => Self::Active,
            2 => Self::Canceled,
            3 => Self::Defeated,
            4 => Self::Succeeded,
            5 => Self::Queued,
            6 => Self::Expired,
            7 => Self::Executed,
            other => return Err(SdkError::Decode(format!("unknown proposal state {other}"))),
        })
    }
}

/// Batch of calls a proposal executes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProposalActions {
    pub targets: Vec<Address>,
    pub values: Vec<U256>,
    pub calldatas: Vec<Bytes>,
}

impl ProposalActions {
    pub fn new(targets: Vec<Address>, values: Vec<U256>, calldatas: Vec<Bytes>) -> Self {
        Self { targets, values, calldatas }
    }

    /// Adds one call.
    pub fn with_call(mut self, target: Address, value: U256, calldata: Bytes) -> Self {
        self.targets.push(target);
        self.values.push(value);
        self.calldatas.push(calldata);
        self
    }

    fn validate(&self) -> Result<(), SdkError> {
        if self.targets.is_empty() {
            return Err(SdkError::InvalidArgument("proposal without actions".into()));
        }
        if self.targets.len() != self.values.len() || self.targets.len() != self.calldatas.len() {
            return Err(SdkError::InvalidArgument(format!(
                "proposal action lengths differ: {} targets, {} values, {} calldatas",
                self.targets.len(),
                self.values.len(),
                self.calldatas.len()
            )));
        }
        Ok(())
    }
}

/// On-chain governance proposals and voting.
pub struct GovernanceService<C> {
    pub(super) ctx: ServiceContext<C>,
}

impl<C: ChainClient> GovernanceService<C> {
    pub async fn create_proposal(
        &self,
        account: Address,
        actions: ProposalActions,
        description: &str,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::CreateProposal), async {
            actions.validate()?;
            let ProposalActions { targets, values, calldatas } = actions;
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Governor)?,
                &IGovernor::proposeCall { targets, values, calldatas, description: description.to_owned() },
                CallOptions::new(account),
            ))
        })
        .await
    }

    /// Queues a succeeded proposal in the timelock.
    pub async fn queue_proposal(
        &self,
        account: Address,
        actions: ProposalActions,
        description: &str,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::QueueProposal), async {
            actions.validate()?;
            let ProposalActions { targets, values, calldatas } = actions;
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Governor)?,
                &IGovernor::queueCall {
                    targets,
                    values,
                    calldatas,
                    descriptionHash: keccak256(description.as_bytes()),
                },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn execute_proposal(
        &self,
        account: Address,
        actions: ProposalActions,
        description: &str,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::ExecuteProposal), async {
            actions.validate()?;
            let ProposalActions { targets, values, calldatas } = actions;
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Governor)?,
                &IGovernor::executeCall {
                    targets,
                    values,
                    calldatas,
                    descriptionHash: keccak256(description.as_bytes()),
                },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn cast_vote(
        &self,
        account: Address,
        proposal_id: ProposalId,
        support: VoteSupport,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::CastVote), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Governor)?,
                &IGovernor::castVoteCall { proposalId: proposal_id, support: support as u8 },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn proposal_state(&self, proposal_id: ProposalId) -> Result<ProposalState, SdkError> {
        let state = self
            .ctx
            .env()
            .read(ContractName::Governor, IGovernor::stateCall { proposalId: proposal_id })
            .await?;
        ProposalState::try_from(state)
    }

    pub async fn has_voted(&self, proposal_id: ProposalId, account: Address) -> Result<bool, SdkError> {
        self.ctx
            .env()
            .read(ContractName::Governor, IGovernor::hasVotedCall { proposalId: proposal_id, account })
            .await
    }

    /// Votes required for a proposal snapshotted at `block_number`.
    pub async fn quorum(&self, block_number: u64) -> Result<U256, SdkError> {
        self.ctx
            .env()
            .read(ContractName::Governor, IGovernor::quorumCall { blockNumber: U256::from(block_number) })
            .await
    }

    pub async fn voting_power(&self, account: Address, block_number: u64) -> Result<U256, SdkError> {
        self.ctx
            .env()
            .read(
                ContractName::Governor,
                IGovernor::getVotesCall { account, blockNumber: U256::from(block_number) },
            )
            .await
    }
}
