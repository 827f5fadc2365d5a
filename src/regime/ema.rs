// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! EMA Tracker -- smoothed baseline of closed-period volume.

use crate::state::EMA_MAX;

/// Fold one closed period into the baseline.
///
/// A zero baseline is seeded with the closed volume directly. Otherwise the
/// result is `(ema * (N - 1) + closed) / N`, truncating, clamped to the 96-bit
/// EMA field.
pub fn update_ema(ema: u128, closed_volume: u64, window: u8) -> u128 {
    if ema == 0 {
        return u128::from(closed_volume);
    }
    let n = u128::from(window.max(1));
    let weighted = ema
        .saturating_mul(n - 1)
        .saturating_add(u128::from(closed_volume));
    (weighted / n).min(EMA_MAX)
}
