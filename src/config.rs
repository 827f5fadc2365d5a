// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Controller configuration and its one-time validation pass.
//!
//! [`FeeConfigParams`] is the raw, serde-friendly parameter set. Calling
//! [`FeeConfigParams::validate`] either yields an immutable [`FeeConfig`] with
//! derived values precomputed, or a [`ConfigError`] naming the first broken
//! rule. Nothing else in the crate accepts unvalidated parameters.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Address, PoolKey};
use crate::volume::VolumeScale;

// -- Bounds ----------------------------------------------------------------

/// Number of entries in the fee-tier table.
pub const FEE_TIER_COUNT: usize = 7;
/// Largest fee the pool engine accepts (100% in hundredths of a bip).
pub const MAX_FEE: u32 = 1_000_000;
pub const MIN_EMA_PERIODS: u8 = 2;
pub const MAX_EMA_PERIODS: u8 = 64;
pub const MAX_DEADBAND: Decimal = dec!(0.5);
/// Lull window may span at most this many periods. Also bounds catch-up.
pub const MAX_LULL_PERIODS: u64 = 24;
pub const MAX_REFERENCE_DECIMALS: u8 = 18;

const BPS_DENOM: Decimal = dec!(10000);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Construction-time validation failures. Fatal: no controller is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("pool currencies must be strictly ascending ({currency0} !< {currency1})")]
    CurrencyOrder { currency0: Address, currency1: Address },

    #[error("reference currency {0} is not one of the pool's currencies")]
    ReferenceNotInPool(Address),

    #[error("reference decimals {0} exceed 18")]
    ReferenceDecimals(u8),

    #[error("fee tiers must be strictly ascending (tier {index} = {fee})")]
    TiersNotAscending { index: usize, fee: u32 },

    #[error("fee tier {fee} exceeds maximum 1000000")]
    TierAboveMax { fee: u32 },

    #[error("{name} index {index} is outside the tier table")]
    IndexOutOfRange { name: &'static str, index: u8 },

    #[error("tier indices must satisfy floor <= initial <= cap and floor <= pause <= cap")]
    IndexOrder,

    #[error("period length must be non-zero")]
    ZeroPeriod,

    #[error("EMA window {0} outside 2..=64")]
    EmaWindow(u8),

    #[error("deadband {0} outside 0..=0.5")]
    Deadband(Decimal),

    #[error("lull window {lull}s outside {min}s..={max}s")]
    LullWindow { lull: u64, min: u64, max: u64 },

    #[error("guardian must be a non-zero address")]
    ZeroGuardian,

    #[error("pool manager must be a non-zero address")]
    ZeroPoolManager,
}

// ---------------------------------------------------------------------------
// FeeConfigParams
// ---------------------------------------------------------------------------

/// Raw controller parameters as supplied by the deployer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeConfigParams {
    /// The single pool this controller serves.
    pub pool: PoolKey,
    /// Side of the pool valued as a fixed reference (e.g. a stablecoin).
    pub reference_currency: Address,
    /// Native decimal precision of the reference currency.
    pub reference_decimals: u8,
    /// Ascending fee values in hundredths of a basis point.
    pub fee_tiers: [u32; FEE_TIER_COUNT],
    pub floor_index: u8,
    pub initial_index: u8,
    pub cap_index: u8,
    /// Tier forced while the guardian has the controller paused.
    pub pause_index: u8,
    /// Length of one aggregation period in seconds.
    pub period_seconds: u64,
    /// EMA smoothing window, in periods.
    pub ema_periods: u8,
    /// Tolerance band around the EMA, as a fraction (0.10 = 10%).
    pub deadband: Decimal,
    /// Inactivity span after which the whole model resets.
    pub lull_reset_seconds: u64,
    /// Identity allowed to pause / unpause.
    pub guardian: Address,
    /// Identity allowed to drive lifecycle callbacks.
    pub pool_manager: Address,
}

impl FeeConfigParams {
    /// Validate every parameter and precompute derived values.
    pub fn validate(self) -> Result<FeeConfig, ConfigError> {
        let pool = self.pool;
        if pool.currency0 >= pool.currency1 {
            return Err(ConfigError::CurrencyOrder {
                currency0: pool.currency0,
                currency1: pool.currency1,
            });
        }
        let reference_is_currency0 = if self.reference_currency == pool.currency0 {
            true
        } else if self.reference_currency == pool.currency1 {
            false
        } else {
            return Err(ConfigError::ReferenceNotInPool(self.reference_currency));
        };
        if self.reference_decimals > MAX_REFERENCE_DECIMALS {
            return Err(ConfigError::ReferenceDecimals(self.reference_decimals));
        }

        for (index, pair) in self.fee_tiers.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::TiersNotAscending { index: index + 1, fee: pair[1] });
            }
        }
        // Ascending, so the last tier is the largest
        let top = self.fee_tiers[FEE_TIER_COUNT - 1];
        if top > MAX_FEE {
            return Err(ConfigError::TierAboveMax { fee: top });
        }

        for (name, index) in [
            ("floor", self.floor_index),
            ("initial", self.initial_index),
            ("cap", self.cap_index),
            ("pause", self.pause_index),
        ] {
            if usize::from(index) >= FEE_TIER_COUNT {
                return Err(ConfigError::IndexOutOfRange { name, index });
            }
        }
        let within_band = |i: u8| self.floor_index <= i && i <= self.cap_index;
        if !within_band(self.initial_index) || !within_band(self.pause_index) {
            return Err(ConfigError::IndexOrder);
        }

        if self.period_seconds == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if !(MIN_EMA_PERIODS..=MAX_EMA_PERIODS).contains(&self.ema_periods) {
            return Err(ConfigError::EmaWindow(self.ema_periods));
        }
        let deadband_bps = deadband_to_bps(self.deadband)?;

        let max_lull = self.period_seconds.saturating_mul(MAX_LULL_PERIODS);
        if self.lull_reset_seconds < self.period_seconds || self.lull_reset_seconds > max_lull {
            return Err(ConfigError::LullWindow {
                lull: self.lull_reset_seconds,
                min: self.period_seconds,
                max: max_lull,
            });
        }

        if self.guardian.is_zero() {
            return Err(ConfigError::ZeroGuardian);
        }
        if self.pool_manager.is_zero() {
            return Err(ConfigError::ZeroPoolManager);
        }

        let volume_scale = VolumeScale::for_decimals(self.reference_decimals);
        Ok(FeeConfig {
            params: self,
            reference_is_currency0,
            volume_scale,
            deadband_bps,
        })
    }
}

/// Deadband fraction to whole basis points. Sub-bip precision truncates.
fn deadband_to_bps(deadband: Decimal) -> Result<u32, ConfigError> {
    if deadband.is_sign_negative() || deadband > MAX_DEADBAND {
        return Err(ConfigError::Deadband(deadband));
    }
    (deadband * BPS_DENOM)
        .trunc()
        .to_u32()
        .ok_or(ConfigError::Deadband(deadband))
}

// ---------------------------------------------------------------------------
// FeeConfig
// ---------------------------------------------------------------------------

/// Validated, immutable configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeConfig {
    params: FeeConfigParams,
    reference_is_currency0: bool,
    volume_scale: VolumeScale,
    deadband_bps: u32,
}

impl FeeConfig {
    pub fn params(&self) -> &FeeConfigParams {
        &self.params
    }

    pub fn pool(&self) -> &PoolKey {
        &self.params.pool
    }

    pub fn reference_is_currency0(&self) -> bool {
        self.reference_is_currency0
    }

    pub fn volume_scale(&self) -> VolumeScale {
        self.volume_scale
    }

    pub fn fee_tiers(&self) -> &[u32; FEE_TIER_COUNT] {
        &self.params.fee_tiers
    }

    /// Fee value of tier `index`. Callers keep `index` inside the band.
    pub fn tier_fee(&self, index: u8) -> u32 {
        self.params.fee_tiers[usize::from(index)]
    }

    pub fn floor_index(&self) -> u8 {
        self.params.floor_index
    }

    pub fn initial_index(&self) -> u8 {
        self.params.initial_index
    }

    pub fn cap_index(&self) -> u8 {
        self.params.cap_index
    }

    pub fn pause_index(&self) -> u8 {
        self.params.pause_index
    }

    pub fn period_seconds(&self) -> u64 {
        self.params.period_seconds
    }

    pub fn ema_periods(&self) -> u8 {
        self.params.ema_periods
    }

    /// Deadband in basis points (0..=5000).
    pub fn deadband_bps(&self) -> u32 {
        self.deadband_bps
    }

    pub fn lull_reset_seconds(&self) -> u64 {
        self.params.lull_reset_seconds
    }

    pub fn guardian(&self) -> Address {
        self.params.guardian
    }

    pub fn pool_manager(&self) -> Address {
        self.params.pool_manager
    }

    /// Whether `index` lies inside `[floor, cap]`.
    pub fn in_band(&self, index: u8) -> bool {
        self.params.floor_index <= index && index <= self.params.cap_index
    }
}

// ===========================================================================
// Tests
// ===========================================================================
