use std::sync::Arc;

use alloy::primitives::{Address, U256};

use super::{Env, ServiceContext};
use crate::{
    abi::{IERC20, IVault},
    client::ChainClient,
    contract::{BindingKind, ContractBinding},
    error::SdkError,
    tx::{Operation, TxLabel},
    types::{CallOptions, TransactionType},
};

/// ERC-4626 vaults, addressed explicitly since a chain may host several.
pub struct VaultService<C> {
    pub(super) ctx: ServiceContext<C>,
}

impl<C: ChainClient> VaultService<C> {
    /// Deposits `assets` and mints shares to the account.
    pub async fn deposit(&self, account: Address, vault: Address, assets: U256) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::OpenVaultDeposit), async {
            Ok(Operation::new(
                vault_binding(&env, BindingKind::Signer, vault),
                &IVault::depositCall { assets, receiver: account },
                CallOptions::new(account),
            ))
        })
        .await
    }

    /// Burns shares to withdraw exactly `assets`.
    pub async fn withdraw(&self, account: Address, vault: Address, assets: U256) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::VaultWithdraw), async {
            Ok(Operation::new(
                vault_binding(&env, BindingKind::Signer, vault),
                &IVault::withdrawCall { assets, receiver: account, owner: account },
                CallOptions::new(account),
            ))
        })
        .await
    }

    /// Burns exactly `shares`.
    pub async fn redeem(&self, account: Address, vault: Address, shares: U256) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::VaultRedeem), async {
            Ok(Operation::new(
                vault_binding(&env, BindingKind::Signer, vault),
                &IVault::redeemCall { shares, receiver: account, owner: account },
                CallOptions::new(account),
            ))
        })
        .await
    }

    /// Grants the vault unlimited allowance over its underlying asset.
    pub async fn approve(&self, account: Address, vault: Address) -> Result<u64, SdkError> {
        let env = self.ctx.env();
        env.execute(TxLabel::new(TransactionType::Approve), async {
            let asset = asset_of(&env, vault).await?;
            Ok(Operation::new(
                env.contract(BindingKind::Signer, asset, "IERC20"),
                &IERC20::approveCall { spender: vault, amount: U256::MAX },
                CallOptions::new(account),
            ))
        })
        .await
    }

    pub async fn approval_status(&self, account: Address, vault: Address, amount: U256) -> Result<bool, SdkError> {
        let env = self.ctx.env();
        let asset = asset_of(&env, vault).await?;
        Ok(env.allowance(asset, account, vault).await? >= amount)
    }

    pub async fn preview_deposit(&self, vault: Address, assets: U256) -> Result<U256, SdkError> {
        let env = self.ctx.env();
        vault_binding(&env, BindingKind::ReadOnly, vault)
            .read(env.client(), IVault::previewDepositCall { assets })
            .await
    }

    pub async fn preview_redeem(&self, vault: Address, shares: U256) -> Result<U256, SdkError> {
        let env = self.ctx.env();
        vault_binding(&env, BindingKind::ReadOnly, vault)
            .read(env.client(), IVault::previewRedeemCall { shares })
            .await
    }

    pub async fn max_withdraw(&self, vault: Address, account: Address) -> Result<U256, SdkError> {
        let env = self.ctx.env();
        vault_binding(&env, BindingKind::ReadOnly, vault)
            .read(env.client(), IVault::maxWithdrawCall { owner: account })
            .await
    }

    /// Vault shares held by the account.
    pub async fn balance(&self, vault: Address, account: Address) -> Result<U256, SdkError> {
        let env = self.ctx.env();
        vault_binding(&env, BindingKind::ReadOnly, vault)
            .read(env.client(), IVault::balanceOfCall { account })
            .await
    }
}

fn vault_binding<C: ChainClient>(env: &Env<C>, kind: BindingKind, vault: Address) -> Arc<ContractBinding> {
    env.contract(kind, vault, "IVault")
}

async fn asset_of<C: ChainClient>(env: &Env<C>, vault: Address) -> Result<Address, SdkError> {
    vault_binding(env, BindingKind::ReadOnly, vault).read(env.client(), IVault::assetCall {}).await
}
