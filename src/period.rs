// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Period Closer, catch-up engine and lull reset.
//!
//! Runs once per inbound trade on an unpaused, initialized state. Elapsed time
//! since `period_start` picks one of three paths:
//!
//! ```text
//! elapsed >= lull window   -> full model reset, then accumulate
//! elapsed >= period length -> catch-up over floor(elapsed / period) closes,
//!                             new period at `now`, then accumulate
//! otherwise                -> accumulate
//! ```
//!
//! Because the lull window is at most `MAX_LULL_PERIODS` periods, the
//! catch-up path never simulates more than that many closes.

use serde::{Deserialize, Serialize};

use crate::config::FeeConfig;
use crate::regime::{catch_up, RegimeCursor};
use crate::state::FeeState;
use crate::types::Direction;
use crate::volume::accumulate;

/// Which path a trade took through the period machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodOutcome {
    /// Still inside the open period.
    Open,
    /// One or more periods were closed.
    Closed { periods: u64 },
    /// Inactivity exceeded the lull window; the model was reset.
    LullReset { elapsed: u64 },
}

/// State after a trade, plus the tier to publish if it changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub state: FeeState,
    pub outcome: PeriodOutcome,
    /// New tier index when it differs from the one in effect before the call.
    pub changed_tier: Option<u8>,
}

/// Apply a trade worth `volume` at `now` to an unpaused state.
pub fn advance(state: &FeeState, config: &FeeConfig, volume: u64, now: u64) -> Advance {
    let elapsed = now.saturating_sub(state.period_start);
    let before = state.fee_index;
    let mut next = *state;

    let outcome = if elapsed >= config.lull_reset_seconds() {
        log::info!(
            "lull reset after {}s idle: tier {} -> {}",
            elapsed,
            before,
            config.initial_index()
        );
        next.ema_volume = 0;
        next.last_direction = Direction::None;
        next.fee_index = config.initial_index();
        start_period(&mut next, now);
        PeriodOutcome::LullReset { elapsed }
    } else if elapsed >= config.period_seconds() {
        let periods = elapsed / config.period_seconds();
        let cursor = catch_up(
            RegimeCursor {
                ema: state.ema_volume,
                fee_index: state.fee_index,
                last_direction: state.last_direction,
            },
            state.period_volume,
            periods,
            config,
        );
        log::debug!(
            "closed {} period(s): ema {} -> {}, tier {} -> {}",
            periods,
            state.ema_volume,
            cursor.ema,
            before,
            cursor.fee_index
        );
        next.ema_volume = cursor.ema;
        next.fee_index = cursor.fee_index;
        next.last_direction = cursor.last_direction;
        start_period(&mut next, now);
        PeriodOutcome::Closed { periods }
    } else {
        PeriodOutcome::Open
    };

    next.period_volume = accumulate(next.period_volume, volume);

    Advance {
        state: next,
        outcome,
        changed_tier: (next.fee_index != before).then_some(next.fee_index),
    }
}

fn start_period(state: &mut FeeState, now: u64) {
    state.period_start = now;
    state.period_volume = 0;
}

// ===========================================================================
// Tests
// ===========================================================================
