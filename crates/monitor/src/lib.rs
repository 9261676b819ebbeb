// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # monitor
//!
//! The UPS monitoring daemon: glues the channel bank, the UDP protocol
//! and the SNMP agent together and drives them from one async loop.
//!
//! - [`MonitorConfig`]: TOML configuration.
//! - [`UdpResponder`]: GETLAST/GETTEMP over UDP.
//! - [`Agent`]: net-snmp pass_persist over stdin/stdout.
//! - [`Daemon`]: timer, signals and shutdown.

pub mod agent;
mod config;
mod daemon;
mod error;
mod responder;
pub mod table;

pub use agent::Agent;
pub use config::{AdcConfig, ChannelConfig, MonitorConfig};
pub use daemon::{
    build_bank, device_info, open_source, resolve_bind_address, run_cycle, CycleOutcome, Daemon,
};
pub use error::MonitorError;
pub use responder::UdpResponder;
