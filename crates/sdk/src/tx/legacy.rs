use std::time::Duration;

use futures::{
    StreamExt,
    future::{self, Either},
};

use super::{Outcome, Settlement};
use crate::{
    client::{EventStream, Sleep},
    config::SdkConfig,
    error::{ChainError, SdkError},
    types::{ContractEvent, Receipt},
};

/// Event-based resolution for wallets that never resolve the submission of
/// a transaction and only surface it through the contract's event stream.
///
/// Any event of the called contract counts as confirmation. Bursts of
/// events are debounced and only the trailing item of a burst is acted on.
#[derive(Clone)]
pub struct LegacyWalletShim {
    debounce: Duration,
    skip_error_codes: Vec<i64>,
    sleep: Sleep,
}

impl LegacyWalletShim {
    pub fn new(debounce: Duration, skip_error_codes: Vec<i64>, sleep: Sleep) -> Self {
        Self { debounce, skip_error_codes, sleep }
    }

    pub fn from_config(config: &SdkConfig, sleep: Sleep) -> Self {
        Self::new(config.debounce(), config.skip_error_codes.clone(), sleep)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    fn is_skipped(&self, err: &ChainError) -> bool {
        err.code.is_some_and(|code| self.skip_error_codes.contains(&code))
    }

    /// Watches the event stream until it settles the operation.
    ///
    /// Returns right after its own settlement attempt; if the stream ends
    /// without a settlement, never returns, leaving the operation to the
    /// primary submission path.
    pub async fn watch(&self, mut events: EventStream, settlement: &Settlement<Outcome>) {
        while let Some(first) = events.next().await {
            let latest = self.quiet_period(&mut events, first).await;
            let outcome = match latest {
                Err(err) if self.is_skipped(&err) => {
                    tracing::trace!(%err, "ignoring benign wallet error");
                    continue;
                },
                Err(err) => Err(SdkError::Receipt(err)),
                Ok(event) => {
                    tracing::debug!(block = event.block_number, "transaction confirmed by contract event");
                    Ok(Receipt::from(&event))
                },
            };
            if !settlement.settle(outcome) {
                tracing::trace!("operation already settled, dropping event confirmation");
            }
            return;
        }
        future::pending::<()>().await
    }

    /// Waits until no new item arrived for the debounce period and returns
    /// the last one seen.
    async fn quiet_period(
        &self,
        events: &mut EventStream,
        mut latest: Result<ContractEvent, ChainError>,
    ) -> Result<ContractEvent, ChainError> {
        loop {
            match future::select(events.next(), (self.sleep)(self.debounce)).await {
                Either::Left((Some(item), _)) => latest = item,
                Either::Left((None, _)) | Either::Right(_) => return latest,
            }
        }
    }
}

impl std::fmt::Debug for LegacyWalletShim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyWalletShim")
            .field("debounce", &self.debounce)
            .field("skip_error_codes", &self.skip_error_codes)
            .finish()
    }
}
