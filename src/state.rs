// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Per-pool mutable state and its fixed-width persisted form.
//!
//! Decision logic works on the plain [`FeeState`] struct. [`PackedState`] is
//! a thin 256-bit serialization layer kept separate from it:
//!
//! ```text
//! bits 0..64     period_volume
//! bits 64..160   ema_volume (96 bits)
//! bits 160..224  period_start
//! bits 224..232  fee_index
//! bits 232..234  last_direction
//! bit  234       paused
//! bit  235       pending_apply
//! bit  236       initialized
//! ```

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Largest value the 96-bit EMA field can hold.
pub const EMA_MAX: u128 = (1u128 << 96) - 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A persisted record that cannot describe a reachable state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("invalid last-direction bits {0:#04b}")]
    InvalidDirection(u8),

    #[error("fee index {index} outside [{floor}, {cap}]")]
    FeeIndexOutOfBand { index: u8, floor: u8, cap: u8 },

    #[error("paused record carries volume (period {period_volume}, ema {ema_volume})")]
    PausedWithVolume { period_volume: u64, ema_volume: u128 },

    #[error("pending fee change on a live, unpaused pool")]
    PendingWhileLive,
}

// ---------------------------------------------------------------------------
// FeeState
// ---------------------------------------------------------------------------

/// Every mutable field of one pool's fee model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeState {
    /// Normalized volume of the open period.
    pub period_volume: u64,
    /// Smoothed baseline volume, at most [`EMA_MAX`].
    pub ema_volume: u128,
    /// Unix seconds at which the open period started.
    pub period_start: u64,
    pub fee_index: u8,
    /// Most recent applied move; `None` after a blocked or clamped close.
    pub last_direction: Direction,
    pub paused: bool,
    /// A fee change is waiting for a call that may publish it.
    pub pending_apply: bool,
    pub initialized: bool,
}

impl FeeState {
    /// Pre-initialization state: nothing learned, tier at `initial_index`.
    pub fn new(initial_index: u8) -> Self {
        Self {
            fee_index: initial_index,
            ..Self::default()
        }
    }

    /// Encode into the 256-bit record.
    pub fn pack(&self) -> PackedState {
        let ema = self.ema_volume.min(EMA_MAX);
        let lo = u128::from(self.period_volume) | (ema << 64);
        let hi = (ema >> 64)
            | (u128::from(self.period_start) << 32)
            | (u128::from(self.fee_index) << 96)
            | (u128::from(self.last_direction.to_bits()) << 104)
            | (u128::from(self.paused) << 106)
            | (u128::from(self.pending_apply) << 107)
            | (u128::from(self.initialized) << 108);

        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&hi.to_be_bytes());
        bytes[16..].copy_from_slice(&lo.to_be_bytes());
        PackedState(bytes)
    }

    /// Reject combinations no sequence of calls can produce.
    ///
    /// The tier band depends on configuration and is checked by the caller.
    pub fn check_consistent(&self) -> Result<(), StateError> {
        if self.paused && (self.period_volume != 0 || self.ema_volume != 0) {
            return Err(StateError::PausedWithVolume {
                period_volume: self.period_volume,
                ema_volume: self.ema_volume,
            });
        }
        if self.pending_apply && self.initialized && !self.paused {
            return Err(StateError::PendingWhileLive);
        }
        Ok(())
    }

    /// Decode a 256-bit record.
    pub fn unpack(packed: &PackedState) -> Result<Self, StateError> {
        let (hi, lo) = packed.words();
        let dir_bits = ((hi >> 104) & 0b11) as u8;
        let last_direction =
            Direction::from_bits(dir_bits).ok_or(StateError::InvalidDirection(dir_bits))?;

        Ok(Self {
            period_volume: lo as u64,
            ema_volume: (lo >> 64) | ((hi & 0xffff_ffff) << 64),
            period_start: (hi >> 32) as u64,
            fee_index: (hi >> 96) as u8,
            last_direction,
            paused: (hi >> 106) & 1 == 1,
            pending_apply: (hi >> 107) & 1 == 1,
            initialized: (hi >> 108) & 1 == 1,
        })
    }
}

// ---------------------------------------------------------------------------
// PackedState
// ---------------------------------------------------------------------------

/// Big-endian 256-bit persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackedState(pub [u8; 32]);

impl PackedState {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Split into (high, low) 128-bit words.
    fn words(&self) -> (u128, u128) {
        let mut hi = [0u8; 16];
        let mut lo = [0u8; 16];
        hi.copy_from_slice(&self.0[..16]);
        lo.copy_from_slice(&self.0[16..]);
        (u128::from_be_bytes(hi), u128::from_be_bytes(lo))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
