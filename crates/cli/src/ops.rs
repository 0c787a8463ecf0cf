use alloy::primitives::{Address, U256};
use stablecoin_sdk::{Sdk, client::ChainClient, error::SdkError, service::Service};
use tokio_util::sync::CancellationToken;

use crate::{args::SwapDirection, events};

/// Waits for an operation unless interrupted.
///
/// Interrupting only stops waiting, a submitted transaction may still be
/// mined.
async fn wait(
    operation: impl Future<Output = Result<u64, SdkError>>,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    tokio::select! {
        result = operation => {
            // Details were already printed by the event handlers
            result?;
            Ok(())
        },
        _ = cancellation_token.cancelled() => {
            anyhow::bail!("interrupted, transaction may still be mined")
        },
    }
}

pub(crate) async fn approve<C: ChainClient>(
    sdk: &Sdk<C>,
    account: Address,
    token: Address,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    events::print(sdk.position.emitter());
    wait(sdk.position.approve(account, token), cancellation_token).await
}

pub(crate) async fn create_proxy<C: ChainClient>(
    sdk: &Sdk<C>,
    account: Address,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    if let Some(proxy) = sdk.position.proxy_wallet(account).await? {
        anyhow::bail!("account {account} already has proxy wallet {proxy}");
    }
    events::print(sdk.position.emitter());
    wait(sdk.position.create_proxy_wallet(account), cancellation_token).await
}

pub(crate) async fn deposit<C: ChainClient>(
    sdk: &Sdk<C>,
    account: Address,
    vault: Address,
    amount: U256,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    events::print(sdk.vault.emitter());
    if !sdk.vault.approval_status(account, vault, amount).await? {
        wait(sdk.vault.approve(account, vault), cancellation_token.clone()).await?;
    }
    wait(sdk.vault.deposit(account, vault, amount), cancellation_token).await
}

pub(crate) async fn create_lock<C: ChainClient>(
    sdk: &Sdk<C>,
    account: Address,
    amount: U256,
    days: u32,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    events::print(sdk.staking.emitter());
    if !sdk.staking.approval_status(account, amount).await? {
        wait(sdk.staking.approve(account), cancellation_token.clone()).await?;
    }
    wait(sdk.staking.create_lock(account, amount, days), cancellation_token).await
}

pub(crate) async fn swap<C: ChainClient>(
    sdk: &Sdk<C>,
    account: Address,
    direction: SwapDirection,
    amount: U256,
    token_name: &str,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    events::print(sdk.stable_swap.emitter());
    let operation = async {
        match direction {
            SwapDirection::ToStablecoin => {
                sdk.stable_swap.swap_token_to_stablecoin(account, amount, token_name).await
            },
            SwapDirection::ToToken => {
                sdk.stable_swap.swap_stablecoin_to_token(account, amount, token_name).await
            },
        }
    };
    wait(operation, cancellation_token).await
}
