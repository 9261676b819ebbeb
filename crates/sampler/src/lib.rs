// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # sampler
//!
//! Turns raw MCP3008 conversions into averaged rail voltages and pairs
//! them with the SoC die temperature.
//!
//! The central type is [`ChannelBank`]: it owns the converter, the set of
//! monitored channels and the cycle parameters, and publishes a
//! [`Snapshot`] after every measurement cycle. Consumers only ever see
//! cloned snapshots.
//!
//! # Example
//! ```
//! use mcp3008::SimulatedAdc;
//! use sampler::{ChannelBank, CycleParams, VoltageDivider};
//!
//! let params = CycleParams {
//!     factor: VoltageDivider::default().factor().unwrap(),
//!     ..Default::default()
//! };
//! let bank = ChannelBank::new(Box::new(SimulatedAdc::ups_board()), params).unwrap();
//! bank.add_channel(0, "MAIN").unwrap();
//! let snap = bank.measure().unwrap();
//! assert!(snap.valid);
//! ```

mod bank;
mod channel;
mod divider;
mod error;
pub mod schedule;
mod snapshot;
mod thermal;

pub use bank::{ChannelBank, CycleParams, DEFAULT_DELTA, DEFAULT_SAMPLES};
pub use channel::Channel;
pub use divider::{VoltageDivider, R_PULLDOWN_OHM, R_PULLUP_OHM, VREF_MV};
pub use error::{SampleError, ThermalError};
pub use snapshot::{epoch_secs, ChannelReading, Snapshot};
pub use thermal::{ThermalInfo, THERMAL_ZONE_PATH};
