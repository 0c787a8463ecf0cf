pub mod args;
mod contracts;
mod events;
mod ops;
mod proxy;
mod tx;

use std::time::Duration;

use alloy::{
    providers::{Provider, ProviderBuilder},
    rpc::client::RpcClient,
    signers::local::PrivateKeySigner,
    transports::layers::{RetryBackoffLayer, ThrottleLayer},
};
use anyhow::Context;
use args::Cli;
use stablecoin_sdk::{
    Sdk,
    client::{ProviderClient, sleep_fn},
    config::SdkConfig,
    num::Converter,
};
use tokio_util::sync::CancellationToken;

use crate::args::Commands;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = match cli.rpc_throttle {
        Some(throttle) => RpcClient::builder()
            .layer(ThrottleLayer::new(throttle))
            .layer(RetryBackoffLayer::new(10, 100, 200))
            .connect(&cli.rpc)
            .await
            .context("connecting to RPC")?,
        None => RpcClient::builder()
            .layer(RetryBackoffLayer::new(10, 100, 200))
            .connect(&cli.rpc)
            .await
            .context("connecting to RPC")?,
    };
    client.set_poll_interval(Duration::from_millis(500));

    let signer = cli
        .private_key
        .as_deref()
        .map(str::parse::<PrivateKeySigner>)
        .transpose()
        .context("parsing private key")?;
    let account = cli.from.or(signer.as_ref().map(PrivateKeySigner::address));
    let provider = match signer {
        Some(signer) => ProviderBuilder::new().wallet(signer).connect_client(client).erased(),
        None => ProviderBuilder::new().connect_client(client).erased(),
    };
    let chain_id = provider.get_chain_id().await.context("fetching chain ID")?;
    tracing::debug!(chain_id, rpc = %cli.rpc, "connected");

    let mut config = match &cli.config {
        Some(path) => {
            SdkConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        },
        None => SdkConfig::default(),
    };
    config.legacy_wallet |= cli.legacy_wallet;

    let sleep = sleep_fn(tokio::time::sleep);
    let sdk = Sdk::new(ProviderClient::new(provider.clone(), sleep.clone()), chain_id, config, sleep);
    let converter = Converter::new(cli.decimals);

    let cancellation_signal = CancellationToken::new();
    let cancellation_token = cancellation_signal.child_token();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to install CTRL+C signal handler");
            return;
        }
        cancellation_signal.cancel();
    });

    let require_account =
        || account.context("account required, see `--from` or `--private-key`");

    match cli.command {
        Commands::Contracts => contracts::render(sdk.registry(), chain_id),
        Commands::Proxy { account: target } => {
            let target = match target {
                Some(target) => target,
                None => require_account()?,
            };
            proxy::render(&sdk, target).await?
        },
        Commands::Tx { hash } => tx::render(provider, hash).await?,
        Commands::Approve { token } => {
            ops::approve(&sdk, require_account()?, token, cancellation_token).await?
        },
        Commands::CreateProxy => {
            ops::create_proxy(&sdk, require_account()?, cancellation_token).await?
        },
        Commands::Deposit { vault, amount } => {
            let amount = converter.to_units(&amount)?;
            ops::deposit(&sdk, require_account()?, vault, amount, cancellation_token).await?
        },
        Commands::CreateLock { amount, days } => {
            let amount = converter.to_units(&amount)?;
            ops::create_lock(&sdk, require_account()?, amount, days, cancellation_token).await?
        },
        Commands::Swap { direction, amount, token_name } => {
            let amount = converter.to_units(&amount)?;
            ops::swap(&sdk, require_account()?, direction, amount, &token_name, cancellation_token)
                .await?
        },
    }

    Ok(())
}
