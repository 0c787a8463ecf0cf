use alloy::primitives::{Address, U256};

use super::ServiceContext;
use crate::{
    abi::{IERC20, IStableSwapModule, IStableSwapModuleWrapper},
    client::ChainClient,
    contract::BindingKind,
    error::SdkError,
    registry::ContractName,
    tx::{Operation, TxLabel},
    types::{CallOptions, TransactionType},
};

/// Contract a token allowance is granted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapSpender {
    /// Swaps pull tokens through the module.
    Module,
    /// Liquidity deposits pull tokens through the wrapper.
    Wrapper,
}

impl SwapSpender {
    fn contract(self) -> ContractName {
        match self {
            Self::Module => ContractName::StableSwapModule,
            Self::Wrapper => ContractName::StableSwapModuleWrapper,
        }
    }
}

/// 1:1 swaps between the stablecoin and a pegged token, and liquidity
/// provision to the swap module.
pub struct StableSwapService<C> {
    pub(super) ctx: ServiceContext<C>,
}

impl<C: ChainClient> StableSwapService<C> {
    pub async fn swap_token_to_stablecoin(
        &self,
        account: Address,
        token_amount: U256,
        token_name: &str,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        let label = TxLabel::with_token(TransactionType::SwapTokenToStableCoin, token_name);
        env.execute(label, async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::StableSwapModule)?,
                &IStableSwapModule::swapTokenToStablecoinCall { usr: account, tokenAmount: token_amount },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn swap_stablecoin_to_token(
        &self,
        account: Address,
        stablecoin_amount: U256,
        token_name: &str,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        let label = TxLabel::with_token(TransactionType::SwapStableCoinToToken, token_name);
        env.execute(label, async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::StableSwapModule)?,
                &IStableSwapModule::swapStablecoinToTokenCall {
                    usr: account,
                    stablecoinAmount: stablecoin_amount,
                },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn add_liquidity(&self, account: Address, amount: U256) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::AddLiquidity), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::StableSwapModuleWrapper)?,
                &IStableSwapModuleWrapper::depositTokensCall { amount },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn remove_liquidity(&self, account: Address, amount: U256) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::RemoveLiquidity), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::StableSwapModuleWrapper)?,
                &IStableSwapModuleWrapper::withdrawTokensCall { amount },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn claim_fees_rewards(&self, account: Address) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::ClaimFeesRewards), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::StableSwapModuleWrapper)?,
                &IStableSwapModuleWrapper::claimFeesRewardsCall {},
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn withdraw_claimed_fees_rewards(&self, account: Address) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::WithdrawClaimedFeesRewards), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::StableSwapModuleWrapper)?,
                &IStableSwapModuleWrapper::withdrawClaimedFeesCall {},
                CallOptions::new(account),
            ))
        })
        .await
    }

    /// Grants `spender` unlimited allowance over `token`.
    pub async fn approve(
        &self,
        account: Address,
        token: Address,
        spender: SwapSpender,
        token_name: &str,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::with_token(TransactionType::Approve, token_name), async {
            Ok(Operation::new(
                env.contract(BindingKind::Signer, token, "IERC20"),
                &IERC20::approveCall { spender: env.address(spender.contract())?, amount: U256::MAX },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn approval_status(
        &self,
        account: Address,
        token: Address,
        spender: SwapSpender,
        amount: U256,
    ) -> Result<bool, SdkError> {
        let env = self.ctx.env();
        let spender = env.address(spender.contract())?;
        Ok(env.allowance(token, account, spender).await? >= amount)
    }

    /// Fee charged on token to stablecoin swaps, 18-decimal fixed point.
    pub async fn fee_in(&self) -> Result<U256, SdkError> {
        self.ctx.env().read(ContractName::StableSwapModule, IStableSwapModule::feeInCall {}).await
    }

    pub async fn fee_out(&self) -> Result<U256, SdkError> {
        self.ctx.env().read(ContractName::StableSwapModule, IStableSwapModule::feeOutCall {}).await
    }
}
