// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Fee Publisher -- the single outbound effect on the pool engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MAX_FEE;
use crate::types::PoolKey;

/// Errors raised by the pool engine when a fee update is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("fee {0} exceeds the engine maximum")]
    FeeTooLarge(u32),

    #[error("pool engine rejected fee update: {0}")]
    Rejected(String),
}

/// Sink for "set the active fee of this pool to X".
///
/// Called at most once per inbound controller operation, and only with a
/// value that differs from the one already in effect.
pub trait FeePublisher {
    fn publish_fee(&mut self, pool: &PoolKey, fee: u32) -> Result<(), PublishError>;
}

/// One accepted fee update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeUpdate {
    pub pool: PoolKey,
    pub fee: u32,
}

/// In-memory publisher that keeps every update it accepts.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    updates: Vec<FeeUpdate>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[FeeUpdate] {
        &self.updates
    }

    /// Most recently published fee, if any.
    pub fn last_fee(&self) -> Option<u32> {
        self.updates.last().map(|u| u.fee)
    }

    /// Hand over the recorded updates, leaving the log empty.
    pub fn take(&mut self) -> Vec<FeeUpdate> {
        std::mem::take(&mut self.updates)
    }
}

impl FeePublisher for RecordingPublisher {
    fn publish_fee(&mut self, pool: &PoolKey, fee: u32) -> Result<(), PublishError> {
        if fee > MAX_FEE {
            return Err(PublishError::FeeTooLarge(fee));
        }
        self.updates.push(FeeUpdate { pool: *pool, fee });
        Ok(())
    }
}

/// Fee in hundredths of a bip as a percentage (3000 -> 0.30).
pub fn fee_to_percent(fee: u32) -> Decimal {
    Decimal::new(i64::from(fee), 4)
}
