// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Volume-regime dynamic fee controller.
//!
//! Observes settled trades for one pool and steps its fee through a fixed
//! tier table based on closed-period volume versus a smoothed baseline.
//! [`FeeController`] is the inbound surface; the decision logic underneath
//! (`period`, `regime`, `guardian`) is pure and host-independent.

pub mod config;
pub mod controller;
pub mod guardian;
pub mod period;
pub mod publisher;
pub mod regime;
pub mod state;
pub mod types;
pub mod volume;
pub mod wasm;

pub use config::{ConfigError, FeeConfig, FeeConfigParams};
pub use controller::{ControllerError, FeeController, StateSnapshot, TradeOutcome, TradeReport};
pub use period::PeriodOutcome;
pub use publisher::{FeePublisher, FeeUpdate, PublishError, RecordingPublisher};
pub use state::{FeeState, PackedState, StateError};
pub use types::{Address, Direction, PoolKey, TradeDelta};
pub use wasm::WasmFeeController;
