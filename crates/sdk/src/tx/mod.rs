//! Transaction lifecycle orchestration.
//!
//! Every state-changing operation of every service runs through
//! [`TransactionOrchestrator::execute`]:
//!
//! 1. *Building*: the operation's build step resolves its target (and the
//!    user's proxy wallet where needed) and encodes the call.
//! 2. *Estimating*: [`GasEstimator`] pads the node estimate. A failure here
//!    ends the operation before anything is sent.
//! 3. *Submitting*: the transaction is sent; with a legacy wallet the
//!    [`LegacyWalletShim`] is armed on the target contract first. Proxy
//!    wallets built on the way are confirmed the same way.
//! 4. *Awaiting hash*: [`TransactionEvent::Pending`] is emitted once the
//!    hash is known.
//! 5. *Awaiting receipt*: the mined receipt (or the shim's confirmation)
//!    settles the operation, [`TransactionEvent::Success`] is emitted and
//!    the block number returned.
//!
//! Any failure emits [`TransactionEvent::Error`] and returns the error.
//! Nothing is retried.

mod legacy;
mod proxy;
mod settlement;

use std::{pin::pin, sync::Arc};

use alloy::{primitives::Address, sol_types::SolCall};
use futures::future;
pub use legacy::LegacyWalletShim;
pub use proxy::ProxyResolver;
pub use settlement::Settlement;
use tracing::Instrument;

use crate::{
    client::ChainClient,
    contract::ContractBinding,
    error::{ChainError, SdkError},
    event::{TransactionEmitter, TransactionEvent},
    gas::GasEstimator,
    types::{CallOptions, ContractCall, GasLimitedOptions, Receipt, TransactionType},
};

/// Final result of an operation's submission.
pub type Outcome = Result<Receipt, SdkError>;

/// Tags carried by all lifecycle events of one operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxLabel {
    pub transaction_type: TransactionType,
    /// Display label of the token involved, for multi-token operations.
    pub token_name: Option<String>,
}

impl TxLabel {
    pub fn new(transaction_type: TransactionType) -> Self {
        Self { transaction_type, token_name: None }
    }

    pub fn with_token(transaction_type: TransactionType, token_name: impl Into<String>) -> Self {
        Self { transaction_type, token_name: Some(token_name.into()) }
    }
}

/// Call an operation sends, produced by its build step.
#[derive(Clone, Debug)]
pub struct Operation {
    binding: Arc<ContractBinding>,
    call: ContractCall,
    options: CallOptions,
}

impl Operation {
    pub fn new<C: SolCall>(binding: Arc<ContractBinding>, call: &C, options: CallOptions) -> Self {
        let call = binding.prepare(call);
        Self { binding, call, options }
    }

    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }

    pub fn call(&self) -> &ContractCall {
        &self.call
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }
}

/// Drives operations through their lifecycle and publishes their events.
#[derive(Debug)]
pub struct TransactionOrchestrator<C> {
    client: Arc<C>,
    emitter: TransactionEmitter,
    estimator: GasEstimator,
    shim: Option<LegacyWalletShim>,
}

impl<C: ChainClient> TransactionOrchestrator<C> {
    pub fn new(client: Arc<C>, emitter: TransactionEmitter) -> Self {
        Self { client, emitter, estimator: GasEstimator::default(), shim: None }
    }

    /// Confirms transactions through contract events as well, for wallets
    /// that never resolve the submission.
    pub fn with_legacy_wallet(mut self, shim: LegacyWalletShim) -> Self {
        self.shim = Some(shim);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn estimator(&self) -> GasEstimator {
        self.estimator
    }

    pub fn emitter(&self) -> &TransactionEmitter {
        &self.emitter
    }

    pub fn legacy_wallet(&self) -> Option<&LegacyWalletShim> {
        self.shim.as_ref()
    }

    /// Runs one operation to settlement and returns the block number it was
    /// mined in.
    ///
    /// Dropping the returned future after the transaction was submitted only
    /// abandons the wait, the transaction itself stays submitted.
    pub async fn execute<F>(&self, label: TxLabel, build: F) -> Result<u64, SdkError>
    where
        F: Future<Output = Result<Operation, SdkError>>,
    {
        let span = tracing::debug_span!("transaction", tx_type = %label.transaction_type);
        let outcome = self.run(&label, build).instrument(span).await;
        let TxLabel { transaction_type, token_name } = label;
        match outcome {
            Ok(receipt) => {
                let block_number = receipt.block_number;
                tracing::info!(%transaction_type, block_number, "transaction mined");
                self.emitter.emit(TransactionEvent::Success { transaction_type, receipt, token_name });
                Ok(block_number)
            },
            Err(error) => {
                tracing::warn!(%transaction_type, %error, "transaction failed");
                self.emitter.emit(TransactionEvent::Error {
                    transaction_type,
                    error: error.clone(),
                    token_name,
                });
                Err(error)
            },
        }
    }

    async fn run<F>(&self, label: &TxLabel, build: F) -> Outcome
    where
        F: Future<Output = Result<Operation, SdkError>>,
    {
        let operation = build.await?;
        tracing::debug!(
            contract = operation.binding.interface(),
            method = operation.call.method,
            "call built"
        );
        let options =
            self.estimator.estimate(&*self.client, &operation.call, operation.options).await?;
        self.submit(label, &operation, options).await
    }

    async fn submit(&self, label: &TxLabel, operation: &Operation, options: GasLimitedOptions) -> Outcome {
        confirm(
            &*self.client,
            self.shim.as_ref(),
            operation.binding.address(),
            self.send_and_confirm(label, operation, &options),
        )
        .await
    }

    async fn send_and_confirm(
        &self,
        label: &TxLabel,
        operation: &Operation,
        options: &GasLimitedOptions,
    ) -> Outcome {
        let hash = self
            .client
            .send_transaction(&operation.call, options)
            .await
            .map_err(SdkError::Submission)?;
        tracing::info!(%hash, "transaction submitted");
        self.emitter.emit(TransactionEvent::Pending {
            hash,
            transaction_type: label.transaction_type,
            token_name: label.token_name.clone(),
        });

        let receipt = self.client.wait_for_receipt(hash).await.map_err(SdkError::Receipt)?;
        if !receipt.status {
            return Err(SdkError::Reverted { hash: Some(hash), block_number: receipt.block_number });
        }
        Ok(receipt)
    }
}

/// Settles a submission by whichever completes first: the send path, or the
/// legacy shim watching the target contract's events.
async fn confirm<C, F>(client: &C, shim: Option<&LegacyWalletShim>, target: Address, send: F) -> Outcome
where
    C: ChainClient,
    F: Future<Output = Outcome>,
{
    let settlement = Settlement::new();
    // Subscribed before sending so that no confirmation event is missed
    let watcher = match shim {
        Some(shim) => {
            Some((shim, client.contract_events(target).await.map_err(SdkError::Submission)?))
        },
        None => None,
    };
    let primary = async {
        settlement.settle(send.await);
    };
    match watcher {
        Some((shim, events)) => {
            future::select(pin!(primary), pin!(shim.watch(events, &settlement))).await;
        },
        None => primary.await,
    }
    settlement.into_inner().unwrap_or_else(|| {
        Err(SdkError::Receipt(ChainError::message("operation ended without settlement")))
    })
}
