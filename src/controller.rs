// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Fee controller -- the inbound surface driven by the pool engine.
//!
//! Every operation follows the same shape: check the caller, compute the next
//! [`FeeState`] from a copy of the current one with the pure transition
//! functions, publish at most one fee, and only then commit. A rejected call
//! or a failed publish leaves the controller exactly as it was.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::FeeConfig;
use crate::guardian::{pause_transition, unpause_transition, GuardianTransition};
use crate::period::{advance, PeriodOutcome};
use crate::publisher::{fee_to_percent, FeePublisher, PublishError};
use crate::state::{FeeState, PackedState, StateError};
use crate::types::{Address, Direction, PoolKey, TradeDelta};
use crate::volume::trade_volume;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejections of inbound calls. None of them mutate state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("caller {0} is not the pool manager")]
    NotPoolManager(Address),

    #[error("caller {0} is not the guardian")]
    NotGuardian(Address),

    #[error("pool already initialized")]
    AlreadyInitialized,

    #[error("pool not initialized")]
    NotInitialized,

    #[error("pool {0} is not served by this controller")]
    UnknownPool(PoolKey),

    #[error("fee publication failed: {0}")]
    Publish(#[from] PublishError),

    #[error("persisted state rejected: {0}")]
    State(#[from] StateError),
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What one trade did to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    /// Paused: the trade was ignored by the model.
    Paused,
    Period(PeriodOutcome),
}

/// Returned from [`FeeController::on_trade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReport {
    pub outcome: TradeOutcome,
    /// Normalized volume credited to the open period (0 while paused).
    pub volume: u64,
    /// Fee in effect after the call.
    pub fee: u32,
    pub published: bool,
}

/// Read-only view of the controller for dashboards and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub initialized: bool,
    pub paused: bool,
    pub pending_apply: bool,
    pub fee_index: u8,
    pub fee: u32,
    pub fee_percent: Decimal,
    pub period_volume: u64,
    pub ema_volume: u128,
    pub period_start: u64,
    pub last_direction: Direction,
}

// ---------------------------------------------------------------------------
// FeeController
// ---------------------------------------------------------------------------

/// Owns the configuration and state of one pool's fee model.
#[derive(Debug, Clone)]
pub struct FeeController {
    config: FeeConfig,
    state: FeeState,
}

impl FeeController {
    /// Controller for a pool that has not been initialized yet.
    pub fn new(config: FeeConfig) -> Self {
        let state = FeeState::new(config.initial_index());
        Self { config, state }
    }

    /// Rebuild a controller from a persisted record.
    pub fn restore(config: FeeConfig, packed: &PackedState) -> Result<Self, ControllerError> {
        let state = FeeState::unpack(packed)?;
        if !config.in_band(state.fee_index) {
            return Err(StateError::FeeIndexOutOfBand {
                index: state.fee_index,
                floor: config.floor_index(),
                cap: config.cap_index(),
            }
            .into());
        }
        state.check_consistent()?;
        Ok(Self { config, state })
    }

    // -- Lifecycle callbacks ------------------------------------------------

    /// Pool creation. Publishes the starting tier (pause tier if paused).
    pub fn initialize<P: FeePublisher>(
        &mut self,
        caller: Address,
        pool: &PoolKey,
        now: u64,
        publisher: &mut P,
    ) -> Result<(), ControllerError> {
        self.check_pool_manager(caller, pool)?;
        if self.state.initialized {
            return Err(ControllerError::AlreadyInitialized);
        }

        let mut next = self.state;
        next.initialized = true;
        next.pending_apply = false;
        next.period_volume = 0;
        next.ema_volume = 0;
        next.last_direction = Direction::None;
        next.period_start = now;
        next.fee_index = if next.paused {
            self.config.pause_index()
        } else {
            self.config.initial_index()
        };

        self.commit(next, Some(next.fee_index), publisher)?;
        log::info!(
            "initialized pool {} at tier {} (fee {}, paused={})",
            pool,
            next.fee_index,
            self.config.tier_fee(next.fee_index),
            next.paused
        );
        Ok(())
    }

    /// Post-trade hook: accumulate volume and close periods as time allows.
    pub fn on_trade<P: FeePublisher>(
        &mut self,
        caller: Address,
        pool: &PoolKey,
        delta: TradeDelta,
        now: u64,
        publisher: &mut P,
    ) -> Result<TradeReport, ControllerError> {
        self.check_pool_manager(caller, pool)?;
        self.require_initialized()?;

        if self.state.paused {
            let published = self.flush_pending(publisher)?;
            return Ok(TradeReport {
                outcome: TradeOutcome::Paused,
                volume: 0,
                fee: self.config.tier_fee(self.state.fee_index),
                published,
            });
        }

        let volume = trade_volume(
            &delta,
            self.config.reference_is_currency0(),
            self.config.volume_scale(),
        );
        let step = advance(&self.state, &self.config, volume, now);
        let published = self.commit(step.state, step.changed_tier, publisher)?;

        Ok(TradeReport {
            outcome: TradeOutcome::Period(step.outcome),
            volume,
            fee: self.config.tier_fee(self.state.fee_index),
            published,
        })
    }

    // -- Guardian -----------------------------------------------------------

    /// Freeze the model at the pause tier. No-op when already paused.
    pub fn pause<P: FeePublisher>(
        &mut self,
        caller: Address,
        publisher: &mut P,
    ) -> Result<(), ControllerError> {
        self.check_guardian(caller)?;
        let t = pause_transition(&self.state, &self.config);
        self.apply_guardian(t, "paused", publisher)
    }

    /// Resume the model from the initial tier. No-op when not paused.
    pub fn unpause<P: FeePublisher>(
        &mut self,
        caller: Address,
        now: u64,
        publisher: &mut P,
    ) -> Result<(), ControllerError> {
        self.check_guardian(caller)?;
        let t = unpause_transition(&self.state, &self.config, now);
        self.apply_guardian(t, "unpaused", publisher)
    }

    /// Publish a deferred fee change outside the trade flow.
    ///
    /// Returns whether anything was published.
    pub fn apply_pending_fee<P: FeePublisher>(
        &mut self,
        caller: Address,
        publisher: &mut P,
    ) -> Result<bool, ControllerError> {
        self.check_guardian(caller)?;
        self.require_initialized()?;
        self.flush_pending(publisher)
    }

    // -- Queries ------------------------------------------------------------

    pub fn config(&self) -> &FeeConfig {
        &self.config
    }

    pub fn state(&self) -> &FeeState {
        &self.state
    }

    /// Fee in effect. Undefined until the pool is initialized.
    pub fn current_fee(&self) -> Result<u32, ControllerError> {
        self.require_initialized()?;
        Ok(self.config.tier_fee(self.state.fee_index))
    }

    /// Tier in effect. Undefined until the pool is initialized.
    pub fn fee_index(&self) -> Result<u8, ControllerError> {
        self.require_initialized()?;
        Ok(self.state.fee_index)
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn pending_apply(&self) -> bool {
        self.state.pending_apply
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    pub fn packed_state(&self) -> PackedState {
        self.state.pack()
    }

    pub fn snapshot(&self) -> Result<StateSnapshot, ControllerError> {
        self.require_initialized()?;
        let s = &self.state;
        let fee = self.config.tier_fee(s.fee_index);
        Ok(StateSnapshot {
            initialized: s.initialized,
            paused: s.paused,
            pending_apply: s.pending_apply,
            fee_index: s.fee_index,
            fee,
            fee_percent: fee_to_percent(fee),
            period_volume: s.period_volume,
            ema_volume: s.ema_volume,
            period_start: s.period_start,
            last_direction: s.last_direction,
        })
    }

    // -- Internals ----------------------------------------------------------

    fn require_initialized(&self) -> Result<(), ControllerError> {
        if self.state.initialized {
            Ok(())
        } else {
            Err(ControllerError::NotInitialized)
        }
    }

    fn check_pool_manager(&self, caller: Address, pool: &PoolKey) -> Result<(), ControllerError> {
        if caller != self.config.pool_manager() {
            log::warn!("rejected lifecycle call from {}", caller);
            return Err(ControllerError::NotPoolManager(caller));
        }
        if pool != self.config.pool() {
            return Err(ControllerError::UnknownPool(*pool));
        }
        Ok(())
    }

    fn check_guardian(&self, caller: Address) -> Result<(), ControllerError> {
        if caller != self.config.guardian() {
            log::warn!("rejected guardian call from {}", caller);
            return Err(ControllerError::NotGuardian(caller));
        }
        Ok(())
    }

    fn apply_guardian<P: FeePublisher>(
        &mut self,
        t: GuardianTransition,
        verb: &str,
        publisher: &mut P,
    ) -> Result<(), ControllerError> {
        if !t.changed {
            log::debug!("already {}, ignoring", verb);
            return Ok(());
        }
        self.commit(t.state, t.publish, publisher)?;
        log::info!(
            "guardian {} controller: tier {} (pending_apply={})",
            verb,
            t.state.fee_index,
            t.state.pending_apply
        );
        Ok(())
    }

    /// Publish the current tier if a deferred change is waiting.
    fn flush_pending<P: FeePublisher>(&mut self, publisher: &mut P) -> Result<bool, ControllerError> {
        if !self.state.pending_apply {
            return Ok(false);
        }
        let mut next = self.state;
        next.pending_apply = false;
        self.commit(next, Some(next.fee_index), publisher)
    }

    /// Publish `tier` (if any) and then adopt `next`. Nothing is adopted when
    /// publication fails.
    fn commit<P: FeePublisher>(
        &mut self,
        next: FeeState,
        tier: Option<u8>,
        publisher: &mut P,
    ) -> Result<bool, ControllerError> {
        if let Some(index) = tier {
            let fee = self.config.tier_fee(index);
            publisher.publish_fee(self.config.pool(), fee)?;
            log::info!("published fee {} (tier {}) for {}", fee, index, self.config.pool());
        }
        self.state = next;
        Ok(tier.is_some())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
