use alloy::primitives::{Address, U256};
use chrono::TimeDelta;

use super::ServiceContext;
use crate::{
    abi::{IERC20, IStaking},
    client::ChainClient,
    contract::BindingKind,
    error::SdkError,
    registry::ContractName,
    tx::{Operation, TxLabel},
    types::{CallOptions, LockId, StreamId, TransactionType},
};

/// Time-locked staking of the governance token.
pub struct StakingService<C> {
    pub(super) ctx: ServiceContext<C>,
}

impl<C: ChainClient> StakingService<C> {
    /// Locks `amount` staking tokens for `lock_days` days.
    pub async fn create_lock(&self, account: Address, amount: U256, lock_days: u32) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::CreateLock), async {
            let lock_period = lock_period(lock_days)?;
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Staking)?,
                &IStaking::createLockCall { amount, lockPeriod: lock_period },
                CallOptions::new(account),
            ))
        })
        .await
    }

    /// Unlocks an expired lock.
    pub async fn unlock(&self, account: Address, lock_id: LockId) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::HandleUnlock), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Staking)?,
                &IStaking::unlockCall { lockId: lock_id },
                CallOptions::new(account),
            ))
        })
        .await
    }

    /// Unlocks before expiry, paying the early withdrawal penalty.
    pub async fn early_unlock(&self, account: Address, lock_id: LockId) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::EarlyUnlock), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Staking)?,
                &IStaking::earlyUnlockCall { lockId: lock_id },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn claim_rewards(&self, account: Address, stream_id: StreamId) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::ClaimRewards), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Staking)?,
                &IStaking::claimAllLockRewardsForUserCall { streamId: stream_id },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn withdraw_all(&self, account: Address) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::WithdrawAll), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::Staking)?,
                &IStaking::withdrawAllStreamsCall {},
                CallOptions::new(account),
            ))
        })
        .await
    }

    /// Grants the staking contract unlimited allowance over the staking token.
    pub async fn approve(&self, account: Address) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::Approve), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::StakingToken)?,
                &IERC20::approveCall { spender: env.address(ContractName::Staking)?, amount: U256::MAX },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn approval_status(&self, account: Address, amount: U256) -> Result<bool, SdkError> {
        let env = self.ctx.env();
        let token = env.address(ContractName::StakingToken)?;
        let staking = env.address(ContractName::Staking)?;
        Ok(env.allowance(token, account, staking).await? >= amount)
    }

    pub async fn locks_length(&self, account: Address) -> Result<U256, SdkError> {
        self.ctx.env().read(ContractName::Staking, IStaking::getLocksLengthCall { account }).await
    }

    pub async fn stream_claimable_amount(
        &self,
        stream_id: StreamId,
        account: Address,
        lock_id: LockId,
    ) -> Result<U256, SdkError> {
        self.ctx
            .env()
            .read(
                ContractName::Staking,
                IStaking::getStreamClaimableAmountPerLockCall { streamId: stream_id, account, lockId: lock_id },
            )
            .await
    }

    /// Shortest lock the staking contract accepts.
    pub async fn min_lock_period(&self) -> Result<TimeDelta, SdkError> {
        let seconds = self.ctx.env().read(ContractName::Staking, IStaking::minLockPeriodCall {}).await?;
        i64::try_from(seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| SdkError::Decode(format!("lock period out of range: {seconds}")))
    }
}

/// Lock period in seconds for a lock of `days` days.
fn lock_period(days: u32) -> Result<U256, SdkError> {
    if days == 0 {
        return Err(SdkError::InvalidArgument("lock period must be at least one day".into()));
    }
    let seconds = TimeDelta::days(i64::from(days)).num_seconds();
    Ok(U256::from(seconds.unsigned_abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_period() {
        assert_eq!(lock_period(1).unwrap(), U256::from(86_400));
        assert_eq!(lock_period(30).unwrap(), U256::from(2_592_000));
        assert!(matches!(lock_period(0), Err(SdkError::InvalidArgument(_))));
    }
}
