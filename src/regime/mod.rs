// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Fee-regime model: one period close is EMA update + classification + step.
//!
//! [`close_period`] is the single-close primitive. [`catch_up`] replays a run
//! of closes in memory; since it is nothing more than a fold over
//! `close_period`, evaluating `k` missed periods at once is identical to `k`
//! eager closes with the same volume sequence.

pub mod classifier;
pub mod ema;
pub mod stepper;

pub use classifier::{classify, ClassifierInput, Signal, DUST_VOLUME};
pub use ema::update_ema;
pub use stepper::{step, Step};

use serde::{Deserialize, Serialize};

use crate::config::FeeConfig;
use crate::types::Direction;

/// The part of the state carried from one close to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeCursor {
    pub ema: u128,
    pub fee_index: u8,
    pub last_direction: Direction,
}

/// What one close decided, for logging and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseRecord {
    pub closed_volume: u64,
    pub signal: Signal,
    pub cursor: RegimeCursor,
}

/// Close one period carrying `closed_volume`.
///
/// The classifier compares against the baseline the period opened with; the
/// EMA update for this period lands in the returned cursor.
pub fn close_period(cursor: RegimeCursor, closed_volume: u64, config: &FeeConfig) -> CloseRecord {
    let signal = classify(&ClassifierInput {
        closed_volume,
        ema: cursor.ema,
        fee_index: cursor.fee_index,
        floor_index: config.floor_index(),
        deadband_bps: config.deadband_bps(),
        last_direction: cursor.last_direction,
    });
    let step = step(
        cursor.fee_index,
        signal.direction,
        config.floor_index(),
        config.cap_index(),
    );
    CloseRecord {
        closed_volume,
        signal,
        cursor: RegimeCursor {
            ema: update_ema(cursor.ema, closed_volume, config.ema_periods()),
            fee_index: step.fee_index,
            last_direction: step.applied,
        },
    }
}

/// Replay `periods` closes: the first carries `first_volume`, the rest zero.
///
/// `periods` is bounded by the caller (at most `MAX_LULL_PERIODS`).
pub fn catch_up(
    cursor: RegimeCursor,
    first_volume: u64,
    periods: u64,
    config: &FeeConfig,
) -> RegimeCursor {
    (0..periods).fold(cursor, |acc, i| {
        let volume = if i == 0 { first_volume } else { 0 };
        let record = close_period(acc, volume, config);
        log::debug!(
            "close {}/{}: volume={} ema={} signal={} locked={} -> tier {} ({})",
            i + 1,
            periods,
            volume,
            acc.ema,
            record.signal.direction,
            record.signal.reversal_locked,
            record.cursor.fee_index,
            record.cursor.last_direction,
        );
        record.cursor
    })
}

// ===========================================================================
// Tests
// ===========================================================================
