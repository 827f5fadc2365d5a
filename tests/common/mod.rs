// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

#![allow(dead_code)]

use rust_decimal_macros::dec;
use volume_fee_engine::{
    Address, ControllerError, FeeConfigParams, FeeController, PoolKey, RecordingPublisher,
    TradeDelta, TradeReport,
};

pub const T0: u64 = 1_700_000_000;
pub const PERIOD: u64 = 300;
pub const LULL: u64 = 3600;
pub const TIERS: [u32; 7] = [95, 400, 900, 2500, 3000, 6000, 9000];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn guardian() -> Address {
    Address::from_low_u64(0x6a)
}

pub fn manager() -> Address {
    Address::from_low_u64(0x4d)
}

pub fn usdc() -> Address {
    Address::from_low_u64(0x0100)
}

pub fn weth() -> Address {
    Address::from_low_u64(0x0200)
}

/// tiers [95..9000], floor 1, initial 4, cap 5, pause 2, 300s periods,
/// EMA over 12 periods, 10% deadband, 1h lull.
pub fn params() -> FeeConfigParams {
    FeeConfigParams {
        pool: PoolKey::new(usdc(), weth()),
        reference_currency: usdc(),
        reference_decimals: 6,
        fee_tiers: TIERS,
        floor_index: 1,
        initial_index: 4,
        cap_index: 5,
        pause_index: 2,
        period_seconds: PERIOD,
        ema_periods: 12,
        deadband: dec!(0.10),
        lull_reset_seconds: LULL,
        guardian: guardian(),
        pool_manager: manager(),
    }
}

/// A controller plus the engine side that records what it publishes.
pub struct Harness {
    pub controller: FeeController,
    pub engine: RecordingPublisher,
    pub pool: PoolKey,
}

impl Harness {
    pub fn new() -> Self {
        init_logging();
        let config = params().validate().expect("test: valid config");
        let pool = *config.pool();
        Self {
            controller: FeeController::new(config),
            engine: RecordingPublisher::new(),
            pool,
        }
    }

    pub fn initialized_at(now: u64) -> Self {
        let mut h = Self::new();
        h.initialize(now).expect("test: initialize");
        h
    }

    pub fn initialize(&mut self, now: u64) -> Result<(), ControllerError> {
        self.controller.initialize(manager(), &self.pool, now, &mut self.engine)
    }

    /// Trade whose USDC leg is `usdc_amount` base units (6 decimals).
    pub fn trade(&mut self, usdc_amount: i128, now: u64) -> TradeReport {
        self.try_trade(usdc_amount, now).expect("test: trade accepted")
    }

    pub fn try_trade(&mut self, usdc_amount: i128, now: u64) -> Result<TradeReport, ControllerError> {
        let delta = TradeDelta::new(usdc_amount, -(usdc_amount / 3000));
        self.controller.on_trade(manager(), &self.pool, delta, now, &mut self.engine)
    }

    pub fn pause(&mut self) {
        self.controller.pause(guardian(), &mut self.engine).expect("test: pause");
    }

    pub fn unpause(&mut self, now: u64) {
        self.controller.unpause(guardian(), now, &mut self.engine).expect("test: unpause");
    }

    pub fn fee_index(&self) -> u8 {
        self.controller.fee_index().expect("test: initialized")
    }

    pub fn publish_count(&self) -> usize {
        self.engine.updates().len()
    }

    pub fn published_fees(&self) -> Vec<u32> {
        self.engine.updates().iter().map(|u| u.fee).collect()
    }
}
