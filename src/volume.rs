// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Volume Accumulator -- turns a settled trade into normalized volume units.
//!
//! One side of every trade is the reference asset (treated as fixed value).
//! Its magnitude is rescaled to a 6-decimal USD-equivalent unit and doubled,
//! since one leg of a swap is half of its two-sided notional. The result is
//! added into the running period total with saturating arithmetic.

use serde::{Deserialize, Serialize};

use crate::types::TradeDelta;

/// Decimal precision of one volume unit (1 USD = 1_000_000 units).
pub const VOLUME_UNIT_DECIMALS: u8 = 6;

/// Factor applied to the one-sided magnitude.
const NOTIONAL_SIDES: u128 = 2;

// ---------------------------------------------------------------------------
// VolumeScale
// ---------------------------------------------------------------------------

/// Precomputed conversion from reference-asset base units to volume units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeScale {
    /// Reference asset already has 6 decimals.
    Identity,
    /// Fewer decimals than the unit: multiply by the factor.
    Multiply(u128),
    /// More decimals than the unit: divide by the factor.
    Divide(u128),
}

impl VolumeScale {
    /// Scale for a reference asset with `decimals` native precision.
    pub fn for_decimals(decimals: u8) -> Self {
        if decimals == VOLUME_UNIT_DECIMALS {
            Self::Identity
        } else if decimals < VOLUME_UNIT_DECIMALS {
            Self::Multiply(10u128.pow(u32::from(VOLUME_UNIT_DECIMALS - decimals)))
        } else {
            Self::Divide(10u128.pow(u32::from(decimals - VOLUME_UNIT_DECIMALS)))
        }
    }

    /// Convert a native magnitude to volume units (saturating, truncating).
    pub fn apply(self, magnitude: u128) -> u128 {
        match self {
            Self::Identity => magnitude,
            Self::Multiply(factor) => magnitude.saturating_mul(factor),
            Self::Divide(factor) => magnitude / factor,
        }
    }
}

// ---------------------------------------------------------------------------
// Trade conversion & accumulation
// ---------------------------------------------------------------------------

/// Normalized two-sided volume of one trade.
///
/// `reference_is_currency0` selects which delta is the reference leg. Values
/// that do not fit the 64-bit counter clamp to `u64::MAX`.
pub fn trade_volume(delta: &TradeDelta, reference_is_currency0: bool, scale: VolumeScale) -> u64 {
    let leg = if reference_is_currency0 {
        delta.amount0
    } else {
        delta.amount1
    };
    let notional = scale.apply(leg.unsigned_abs()).saturating_mul(NOTIONAL_SIDES);
    u64::try_from(notional).unwrap_or(u64::MAX)
}

/// Add `volume` into the running period total, clamping at the counter max.
pub fn accumulate(period_volume: u64, volume: u64) -> u64 {
    period_volume.saturating_add(volume)
}

// ===========================================================================
// Tests
// ===========================================================================
