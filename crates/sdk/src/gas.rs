use std::num::NonZeroU64;

use crate::{
    client::ChainClient,
    error::{ChainError, SdkError},
    types::{CallOptions, ContractCall, GasLimitedOptions},
};

/// Safety factor applied to raw gas estimates, as a fraction (1.2).
pub const SAFETY_MULTIPLIER: (u64, u64) = (12, 10);

/// Turns raw node estimates into padded gas limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasEstimator {
    numerator: u64,
    denominator: u64,
}

impl Default for GasEstimator {
    fn default() -> Self {
        Self { numerator: SAFETY_MULTIPLIER.0, denominator: SAFETY_MULTIPLIER.1 }
    }
}

impl GasEstimator {
    /// `ceil(raw * multiplier)`; `None` for a zero or overflowing result.
    pub fn apply(&self, raw: u64) -> Option<NonZeroU64> {
        let scaled = (raw as u128 * self.numerator as u128).div_ceil(self.denominator as u128);
        u64::try_from(scaled).ok().and_then(NonZeroU64::new)
    }

    /// Estimates the call and finalizes the options with the padded limit.
    pub async fn estimate<C: ChainClient>(
        &self,
        client: &C,
        call: &ContractCall,
        options: CallOptions,
    ) -> Result<GasLimitedOptions, SdkError> {
        let raw = client.estimate_gas(call, &options).await.map_err(SdkError::Estimation)?;
        let gas = self.apply(raw).ok_or_else(|| {
            SdkError::Estimation(ChainError::message(format!("unusable gas estimate {raw}")))
        })?;
        tracing::debug!(method = call.method, raw, gas = gas.get(), "estimated gas");
        Ok(options.with_gas(gas))
    }
}
