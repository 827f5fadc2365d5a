// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Tier Stepper -- at most one tier move per close, clamped to the band.

use crate::types::Direction;

/// Outcome of one step attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub fee_index: u8,
    /// Direction actually applied; `None` when the index did not change.
    pub applied: Direction,
}

/// Move `fee_index` one tier in `direction`, clamped to `[floor, cap]`.
pub fn step(fee_index: u8, direction: Direction, floor: u8, cap: u8) -> Step {
    let next = match direction {
        Direction::Up if fee_index < cap => fee_index + 1,
        Direction::Down if fee_index > floor => fee_index - 1,
        _ => fee_index,
    };
    Step {
        fee_index: next,
        applied: if next == fee_index { Direction::None } else { direction },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_one_tier() {
        assert_eq!(step(3, Direction::Up, 1, 5), Step { fee_index: 4, applied: Direction::Up });
        assert_eq!(step(3, Direction::Down, 1, 5), Step { fee_index: 2, applied: Direction::Down });
    }

    #[test]
    fn none_holds_and_clears_direction() {
        assert_eq!(step(3, Direction::None, 1, 5), Step { fee_index: 3, applied: Direction::None });
    }

    #[test]
    fn clamped_attempt_is_not_an_applied_move() {
        assert_eq!(step(5, Direction::Up, 1, 5), Step { fee_index: 5, applied: Direction::None });
        assert_eq!(step(1, Direction::Down, 1, 5), Step { fee_index: 1, applied: Direction::None });
    }
}
