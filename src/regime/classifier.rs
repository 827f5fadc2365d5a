// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Regime Classifier -- closed volume vs. baseline, with hysteresis.
//!
//! Three filters sit between the raw comparison and the emitted signal:
//! a dust floor, a deadband around the EMA, and a reversal lock that demands
//! one confirming period before the direction may flip.

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Volume at or below this (one reference unit) counts as no volume.
pub const DUST_VOLUME: u64 = 1_000_000;

const BPS_DENOM: u128 = 10_000;

/// Inputs to one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierInput {
    pub closed_volume: u64,
    /// Baseline the period opened with.
    pub ema: u128,
    pub fee_index: u8,
    pub floor_index: u8,
    pub deadband_bps: u32,
    pub last_direction: Direction,
}

/// Result of one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Direction to hand to the stepper.
    pub direction: Direction,
    /// A move was computed but blocked by the reversal lock.
    pub reversal_locked: bool,
}

/// Deadband bounds `(lower, upper)` around a non-zero EMA.
pub fn deadband_bounds(ema: u128, deadband_bps: u32) -> (u128, u128) {
    let band = u128::from(deadband_bps);
    let lower = ema.saturating_mul(BPS_DENOM.saturating_sub(band)) / BPS_DENOM;
    let upper = ema.saturating_mul(BPS_DENOM + band) / BPS_DENOM;
    (lower, upper)
}

/// Classify a closed period.
pub fn classify(input: &ClassifierInput) -> Signal {
    let volume = if input.closed_volume <= DUST_VOLUME {
        0
    } else {
        u128::from(input.closed_volume)
    };

    let computed = if input.ema == 0 {
        // No baseline yet: only the anti-stall rule may move the tier
        if volume == 0 && input.fee_index > input.floor_index {
            Direction::Down
        } else {
            Direction::None
        }
    } else {
        let (lower, upper) = deadband_bounds(input.ema, input.deadband_bps);
        if volume > upper {
            Direction::Up
        } else if volume < lower {
            Direction::Down
        } else {
            Direction::None
        }
    };

    if computed.opposes(input.last_direction) {
        Signal {
            direction: Direction::None,
            reversal_locked: true,
        }
    } else {
        Signal {
            direction: computed,
            reversal_locked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(closed_volume: u64, ema: u128, last: Direction) -> ClassifierInput {
        ClassifierInput {
            closed_volume,
            ema,
            fee_index: 4,
            floor_index: 1,
            deadband_bps: 1000,
            last_direction: last,
        }
    }

    #[test]
    fn bounds_at_ten_percent() {
        assert_eq!(deadband_bounds(2_000_000, 1000), (1_800_000, 2_200_000));
        assert_eq!(deadband_bounds(2_000_000, 0), (2_000_000, 2_000_000));
        assert_eq!(deadband_bounds(2_000_000, 5000), (1_000_000, 3_000_000));
    }

    #[test]
    fn deadband_edges_are_inclusive() {
        let ema = 2_000_000;
        assert_eq!(classify(&input(2_200_000, ema, Direction::None)).direction, Direction::None);
        assert_eq!(classify(&input(2_200_001, ema, Direction::None)).direction, Direction::Up);
        assert_eq!(classify(&input(1_800_000, ema, Direction::None)).direction, Direction::None);
        assert_eq!(classify(&input(1_799_999, ema, Direction::None)).direction, Direction::Down);
    }

    #[test]
    fn dust_counts_as_zero() {
        // EMA small enough that dust would otherwise sit inside the band
        let ema = 1_000_000;
        let s = classify(&input(DUST_VOLUME, ema, Direction::None));
        assert_eq!(s.direction, Direction::Down);
        let s = classify(&input(DUST_VOLUME + 1, ema, Direction::None));
        assert_eq!(s.direction, Direction::None);
    }

    #[test]
    fn zero_baseline_never_moves_on_activity() {
        let s = classify(&input(5_000_000, 0, Direction::None));
        assert_eq!(s.direction, Direction::None);
        assert!(!s.reversal_locked);
    }

    #[test]
    fn zero_baseline_anti_stall_steps_down() {
        assert_eq!(classify(&input(0, 0, Direction::None)).direction, Direction::Down);
        assert_eq!(classify(&input(DUST_VOLUME, 0, Direction::None)).direction, Direction::Down);

        let at_floor = ClassifierInput {
            fee_index: 1,
            ..input(0, 0, Direction::None)
        };
        assert_eq!(classify(&at_floor).direction, Direction::None);
    }

    #[test]
    fn reversal_is_locked_for_one_period() {
        let s = classify(&input(0, 2_000_000, Direction::Up));
        assert_eq!(s.direction, Direction::None);
        assert!(s.reversal_locked);

        let s = classify(&input(9_000_000, 2_000_000, Direction::Down));
        assert_eq!(s.direction, Direction::None);
        assert!(s.reversal_locked);
    }

    #[test]
    fn same_direction_is_not_locked() {
        let s = classify(&input(0, 2_000_000, Direction::Down));
        assert_eq!(s.direction, Direction::Down);
        assert!(!s.reversal_locked);
    }

    #[test]
    fn anti_stall_respects_reversal_lock() {
        let s = classify(&input(0, 0, Direction::Up));
        assert_eq!(s.direction, Direction::None);
        assert!(s.reversal_locked);
    }
}
