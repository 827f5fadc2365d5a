// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Browser surface: drive one controller from JS and watch its fee updates.
//!
//! The wrapper plays the pool engine itself, so lifecycle calls go through
//! with the configured pool manager as caller. Guardian calls take the
//! caller address as a hex string.

use wasm_bindgen::prelude::*;

use crate::config::FeeConfigParams;
use crate::controller::FeeController;
use crate::publisher::{fee_to_percent, FeeUpdate, RecordingPublisher};
use crate::types::{Address, TradeDelta};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct WasmFeeController {
    inner: FeeController,
    publisher: RecordingPublisher,
}

#[wasm_bindgen]
impl WasmFeeController {
    /// Build from a JS object shaped like `FeeConfigParams`.
    #[wasm_bindgen(constructor)]
    pub fn new(params: JsValue) -> Result<WasmFeeController, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let params: FeeConfigParams = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsError::new(&e.to_string()))?;
        let config = params.validate()?;
        Ok(Self {
            inner: FeeController::new(config),
            publisher: RecordingPublisher::new(),
        })
    }

    pub fn initialize(&mut self, now: u64) -> Result<(), JsError> {
        let (manager, pool) = (self.inner.config().pool_manager(), *self.inner.config().pool());
        self.inner.initialize(manager, &pool, now, &mut self.publisher)?;
        self.echo_last_update();
        Ok(())
    }

    /// Feed one settled trade. Returns the `TradeReport` as a JS object.
    pub fn on_trade(&mut self, amount0: i64, amount1: i64, now: u64) -> Result<JsValue, JsError> {
        let (manager, pool) = (self.inner.config().pool_manager(), *self.inner.config().pool());
        let delta = TradeDelta::new(i128::from(amount0), i128::from(amount1));
        let report = self.inner.on_trade(manager, &pool, delta, now, &mut self.publisher)?;
        if report.published {
            self.echo_last_update();
        }
        serde_wasm_bindgen::to_value(&report).map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn pause(&mut self, caller: &str) -> Result<(), JsError> {
        let caller: Address = caller.parse()?;
        let before = self.publisher.updates().len();
        self.inner.pause(caller, &mut self.publisher)?;
        self.echo_since(before);
        Ok(())
    }

    pub fn unpause(&mut self, caller: &str, now: u64) -> Result<(), JsError> {
        let caller: Address = caller.parse()?;
        let before = self.publisher.updates().len();
        self.inner.unpause(caller, now, &mut self.publisher)?;
        self.echo_since(before);
        Ok(())
    }

    pub fn apply_pending_fee(&mut self, caller: &str) -> Result<bool, JsError> {
        let caller: Address = caller.parse()?;
        let published = self.inner.apply_pending_fee(caller, &mut self.publisher)?;
        if published {
            self.echo_last_update();
        }
        Ok(published)
    }

    /// Fails until `initialize` has run.
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        let snapshot = self.inner.snapshot()?;
        serde_wasm_bindgen::to_value(&snapshot).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Packed 32-byte state record.
    pub fn packed_state(&self) -> Vec<u8> {
        self.inner.packed_state().as_bytes().to_vec()
    }

    /// Drain fee updates published since the last call.
    pub fn take_fee_updates(&mut self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.publisher.take()).unwrap_or(JsValue::NULL)
    }
}

impl WasmFeeController {
    fn echo_since(&self, before: usize) {
        if let Some(fee) = published_since(self.publisher.updates(), before) {
            echo_fee(fee);
        }
    }

    fn echo_last_update(&self) {
        if let Some(fee) = self.publisher.last_fee() {
            echo_fee(fee);
        }
    }
}

/// Latest fee recorded after the first `before` updates, if any.
fn published_since(updates: &[FeeUpdate], before: usize) -> Option<u32> {
    updates.get(before..).and_then(<[FeeUpdate]>::last).map(|u| u.fee)
}

fn echo_fee(fee: u32) {
    log(&format!("fee -> {} ({}%)", fee, fee_to_percent(fee)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PoolKey;
    use rust_decimal_macros::dec;

    fn controller() -> FeeController {
        let usdc = Address::from_low_u64(1);
        FeeConfigParams {
            pool: PoolKey::new(usdc, Address::from_low_u64(2)),
            reference_currency: usdc,
            reference_decimals: 6,
            fee_tiers: [95, 400, 900, 2500, 3000, 6000, 9000],
            floor_index: 1,
            initial_index: 4,
            cap_index: 5,
            pause_index: 2,
            period_seconds: 300,
            ema_periods: 12,
            deadband: dec!(0.10),
            lull_reset_seconds: 3600,
            guardian: Address::from_low_u64(9),
            pool_manager: Address::from_low_u64(8),
        }
        .validate()
        .map(FeeController::new)
        .expect("test: valid config")
    }

    #[test]
    fn guardian_fee_changes_are_picked_up_for_echo() {
        let mut c = controller();
        let pool = *c.config().pool();
        let mut p = RecordingPublisher::new();
        c.initialize(Address::from_low_u64(8), &pool, 0, &mut p).expect("test: init");

        let before = p.updates().len();
        c.pause(Address::from_low_u64(9), &mut p).expect("test: pause");
        assert_eq!(published_since(p.updates(), before), Some(900));

        // Repeated pause publishes nothing, so nothing is echoed
        let before = p.updates().len();
        c.pause(Address::from_low_u64(9), &mut p).expect("test: pause");
        assert_eq!(published_since(p.updates(), before), None);

        c.unpause(Address::from_low_u64(9), 10, &mut p).expect("test: unpause");
        assert_eq!(published_since(p.updates(), before), Some(3000));
    }

    #[test]
    fn nothing_published_past_the_end() {
        assert_eq!(published_since(&[], 0), None);
        assert_eq!(published_since(&[], 3), None);
    }
}
