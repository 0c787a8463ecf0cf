use alloy::primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};

use super::{Env, ServiceContext};
use crate::{
    abi::{IERC20, IProxyActions, IProxyWallet, IProxyWalletRegistry},
    client::ChainClient,
    contract::BindingKind,
    error::SdkError,
    registry::ContractName,
    tx::{Operation, TxLabel},
    types::{CallOptions, PositionId, TransactionType},
};

/// Collateralized debt positions, operated through the user's proxy wallet.
pub struct PositionService<C> {
    pub(super) ctx: ServiceContext<C>,
}

impl<C: ChainClient> PositionService<C> {
    /// Locks native collateral and draws stablecoin in a new position.
    pub async fn open_position(
        &self,
        user: Address,
        collateral_pool_id: B256,
        collateral: U256,
        stablecoin_amount: U256,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::OpenPosition), async {
            let proxy = env.ensure_proxy(user).await?;
            let action = IProxyActions::openLockNativeAndDrawCall {
                manager: env.address(ContractName::PositionManager)?,
                stabilityFeeCollector: env.address(ContractName::StabilityFeeCollector)?,
                collateralTokenAdapter: env.address(ContractName::CollateralTokenAdapter)?,
                stablecoinAdapter: env.address(ContractName::StablecoinAdapter)?,
                collateralPoolId: collateral_pool_id,
                stablecoinAmount: stablecoin_amount,
                data: owner_data(user),
            };
            through_proxy(&env, user, proxy, &action, Some(collateral))
        })
        .await
    }

    /// Adds collateral to a position.
    pub async fn top_up_position(
        &self,
        user: Address,
        position_id: PositionId,
        collateral: U256,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::TopUpPosition), async {
            let proxy = env.ensure_proxy(user).await?;
            let action = IProxyActions::lockNativeCall {
                manager: env.address(ContractName::PositionManager)?,
                collateralTokenAdapter: env.address(ContractName::CollateralTokenAdapter)?,
                positionId: position_id,
                data: owner_data(user),
            };
            through_proxy(&env, user, proxy, &action, Some(collateral))
        })
        .await
    }

    /// Adds collateral to a position and draws more stablecoin.
    pub async fn top_up_position_and_borrow(
        &self,
        user: Address,
        position_id: PositionId,
        collateral: U256,
        stablecoin_amount: U256,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::TopUpPositionAndBorrow), async {
            let proxy = env.ensure_proxy(user).await?;
            let action = IProxyActions::lockNativeAndDrawCall {
                manager: env.address(ContractName::PositionManager)?,
                stabilityFeeCollector: env.address(ContractName::StabilityFeeCollector)?,
                collateralTokenAdapter: env.address(ContractName::CollateralTokenAdapter)?,
                stablecoinAdapter: env.address(ContractName::StablecoinAdapter)?,
                positionId: position_id,
                stablecoinAmount: stablecoin_amount,
                data: owner_data(user),
            };
            through_proxy(&env, user, proxy, &action, Some(collateral))
        })
        .await
    }

    /// Repays all debt of a position and unlocks the given collateral.
    pub async fn close_position(
        &self,
        user: Address,
        position_id: PositionId,
        collateral: U256,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::ClosePosition), async {
            let proxy = env.ensure_proxy(user).await?;
            let action = IProxyActions::wipeAllAndUnlockNativeCall {
                manager: env.address(ContractName::PositionManager)?,
                collateralTokenAdapter: env.address(ContractName::CollateralTokenAdapter)?,
                stablecoinAdapter: env.address(ContractName::StablecoinAdapter)?,
                positionId: position_id,
                collateralAmount: collateral,
                data: owner_data(user),
            };
            through_proxy(&env, user, proxy, &action, None)
        })
        .await
    }

    /// Repays part of the debt of a position and unlocks the given collateral.
    pub async fn partially_close_position(
        &self,
        user: Address,
        position_id: PositionId,
        collateral: U256,
        stablecoin_amount: U256,
    ) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::PartiallyClosePosition), async {
            let proxy = env.ensure_proxy(user).await?;
            let action = IProxyActions::wipeAndUnlockNativeCall {
                manager: env.address(ContractName::PositionManager)?,
                collateralTokenAdapter: env.address(ContractName::CollateralTokenAdapter)?,
                stablecoinAdapter: env.address(ContractName::StablecoinAdapter)?,
                positionId: position_id,
                collateralAmount: collateral,
                stablecoinAmount: stablecoin_amount,
                data: owner_data(user),
            };
            through_proxy(&env, user, proxy, &action, None)
        })
        .await
    }

    /// Grants the user's proxy wallet unlimited allowance over `token`,
    /// building the proxy wallet first if the user has none.
    pub async fn approve(&self, user: Address, token: Address) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::Approve), async {
            let proxy = env.ensure_proxy(user).await?;
            Ok(Operation::new(
                env.contract(BindingKind::Signer, token, "IERC20"),
                &IERC20::approveCall { spender: proxy, amount: U256::MAX },
                CallOptions::new(user),
            ))
        })
        .await
    }

    pub async fn create_proxy_wallet(&self, user: Address) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::CreateProxyWallet), async {
            Ok(Operation::new(
                env.binding(BindingKind::Signer, ContractName::ProxyWalletRegistry)?,
                &IProxyWalletRegistry::buildCall { owner: user },
                CallOptions::new(user),
            ))
        })
        .await
    }

    /// Proxy wallet of the user, `None` if none was built yet.
    pub async fn proxy_wallet(&self, user: Address) -> Result<Option<Address>, SdkError> {
        self.ctx.env().proxy_of(user).await
    }

    /// Whether the user's proxy wallet may spend at least `amount` of
    /// `token`. Users without a proxy wallet never have an approval.
    pub async fn approval_status(&self, user: Address, token: Address, amount: U256) -> Result<bool, SdkError> {
        let env = self.ctx.env();
        let Some(proxy) = env.proxy_of(user).await? else {
            return Ok(false);
        };
        Ok(env.allowance(token, user, proxy).await? >= amount)
    }

    pub async fn stablecoin_balance(&self, user: Address) -> Result<U256, SdkError> {
        let env = self.ctx.env();
        env.token_balance(env.address(ContractName::Stablecoin)?, user).await
    }
}

/// Extra data proxy actions forward to the collateral adapter.
fn owner_data(user: Address) -> Bytes {
    Bytes::from(user.abi_encode())
}

/// Wraps a proxy action into `execute` on the user's proxy wallet.
fn through_proxy<C: ChainClient, A: SolCall>(
    env: &Env<C>,
    user: Address,
    proxy: Address,
    action: &A,
    value: Option<U256>,
) -> Result<Operation, SdkError> {
    let call = IProxyWallet::executeCall {
        target: env.address(ContractName::ProxyActions)?,
        data: Bytes::from(action.abi_encode()),
    };
    let mut options = CallOptions::new(user);
    if let Some(value) = value {
        options = options.with_value(value);
    }
    Ok(Operation::new(env.contract(BindingKind::Signer, proxy, "IProxyWallet"), &call, options))
}
