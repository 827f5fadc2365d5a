// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Guardian Pause Controller -- privileged override of the fee model.
//!
//! Pausing clears the learned baseline and pins the tier at `pause_index`;
//! unpausing clears it again and returns to `initial_index`. Before the pool
//! is initialized the new tier cannot be published yet, so it is parked behind
//! `pending_apply` and published by the next call that is able to.

use crate::config::FeeConfig;
use crate::state::FeeState;
use crate::types::Direction;

/// Result of a pause/unpause request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardianTransition {
    pub state: FeeState,
    /// Tier index to publish right away, if any.
    pub publish: Option<u8>,
    /// `false` when the request was a no-op (already in the target mode).
    pub changed: bool,
}

/// Freeze the model at the pause tier.
pub fn pause_transition(state: &FeeState, config: &FeeConfig) -> GuardianTransition {
    if state.paused {
        return unchanged(state);
    }
    let mut next = override_tier(state, config.pause_index());
    next.paused = true;
    finish(state, next)
}

/// Resume the model from the initial tier, opening a fresh period at `now`.
pub fn unpause_transition(state: &FeeState, config: &FeeConfig, now: u64) -> GuardianTransition {
    if !state.paused {
        return unchanged(state);
    }
    let mut next = override_tier(state, config.initial_index());
    next.paused = false;
    next.period_start = now;
    finish(state, next)
}

fn unchanged(state: &FeeState) -> GuardianTransition {
    GuardianTransition {
        state: *state,
        publish: None,
        changed: false,
    }
}

fn override_tier(state: &FeeState, fee_index: u8) -> FeeState {
    FeeState {
        period_volume: 0,
        ema_volume: 0,
        last_direction: Direction::None,
        fee_index,
        ..*state
    }
}

/// Publish now when the pool exists, otherwise defer behind `pending_apply`.
fn finish(before: &FeeState, mut next: FeeState) -> GuardianTransition {
    let publish = if next.initialized {
        next.pending_apply = false;
        (next.fee_index != before.fee_index).then_some(next.fee_index)
    } else {
        next.pending_apply = true;
        None
    };
    GuardianTransition {
        state: next,
        publish,
        changed: true,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
