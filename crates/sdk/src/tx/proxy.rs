use alloy::primitives::Address;

use super::{LegacyWalletShim, Outcome, confirm};
use crate::{
    abi::IProxyWalletRegistry,
    client::ChainClient,
    contract::ContractBinding,
    error::{ChainError, SdkError},
    gas::GasEstimator,
    types::{CallOptions, ContractCall, GasLimitedOptions},
};

/// Looks up and provisions per-user proxy wallets.
pub struct ProxyResolver<'a, C> {
    client: &'a C,
    estimator: GasEstimator,
    registry: &'a ContractBinding,
    shim: Option<&'a LegacyWalletShim>,
}

impl<'a, C: ChainClient> ProxyResolver<'a, C> {
    pub fn new(client: &'a C, estimator: GasEstimator, registry: &'a ContractBinding) -> Self {
        Self { client, estimator, registry, shim: None }
    }

    /// Confirms the build transaction through registry events as well, for
    /// wallets that never resolve the submission.
    pub fn with_legacy_wallet(mut self, shim: Option<&'a LegacyWalletShim>) -> Self {
        self.shim = shim;
        self
    }

    /// Proxy wallet of the user, if one was built.
    pub async fn proxy_of(&self, user: Address) -> Result<Option<Address>, SdkError> {
        let proxy =
            self.registry.read(self.client, IProxyWalletRegistry::proxiesCall { owner: user }).await?;
        // Registry answers with the zero address for users without a proxy
        Ok((!proxy.is_zero()).then_some(proxy))
    }

    /// Returns the user's proxy wallet, building one first if needed.
    ///
    /// Building is a plain transaction without lifecycle events. It is
    /// confirmed (by receipt, or by registry event with a legacy wallet)
    /// before the registry is read again.
    pub async fn ensure_proxy(&self, user: Address) -> Result<Address, SdkError> {
        self.resolve(user).await.map_err(SdkError::into_proxy_resolution)
    }

    async fn resolve(&self, user: Address) -> Result<Address, SdkError> {
        if let Some(proxy) = self.proxy_of(user).await? {
            tracing::trace!(%user, %proxy, "proxy wallet found");
            return Ok(proxy);
        }

        tracing::info!(%user, "building proxy wallet");
        let call = self.registry.prepare(&IProxyWalletRegistry::buildCall { owner: user });
        let options = self.estimator.estimate(self.client, &call, CallOptions::new(user)).await?;
        let send = self.send_build(&call, &options);
        let receipt = confirm(self.client, self.shim, self.registry.address(), send).await?;
        tracing::debug!(%user, block_number = receipt.block_number, "proxy wallet built");

        self.proxy_of(user).await?.ok_or_else(|| {
            SdkError::ProxyResolution(ChainError::message(format!(
                "no proxy wallet registered for {user} after build"
            )))
        })
    }

    async fn send_build(&self, call: &ContractCall, options: &GasLimitedOptions) -> Outcome {
        let hash = self.client.send_transaction(call, options).await.map_err(SdkError::Submission)?;
        tracing::debug!(%hash, "proxy wallet build submitted");
        let receipt = self.client.wait_for_receipt(hash).await.map_err(SdkError::Receipt)?;
        if !receipt.status {
            return Err(SdkError::Reverted { hash: Some(hash), block_number: receipt.block_number });
        }
        Ok(receipt)
    }
}
